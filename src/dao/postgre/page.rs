use super::QueryResult;
use crate::model::{Page, Table};
use sqlx::error::Error;

impl Table<Page> {
    pub async fn get_one(&self, id: &str) -> Result<Option<Page>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "pages" WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn upsert(
        &self,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "pages" (id, title, content)
            VALUES($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET title = EXCLUDED.title, content = EXCLUDED.content,
                updated_at = now()
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await
    }
}
