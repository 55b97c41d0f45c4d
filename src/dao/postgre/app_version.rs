use super::QueryResult;
use crate::model::{AppVersion, Table};
use sqlx::error::Error;

impl Table<AppVersion> {
    pub async fn get_latest(&self) -> Result<Option<AppVersion>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "app_versions" ORDER BY released_at DESC LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(&self, version: &str) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "app_versions" (version) VALUES($1)
            "#,
        )
        .bind(version)
        .execute(&self.pool)
        .await
    }
}
