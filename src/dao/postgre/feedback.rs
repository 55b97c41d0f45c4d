use super::QueryResult;
use crate::model::{Feedback, Table};
use sqlx::error::Error;

impl Table<Feedback> {
    pub async fn insert(&self, feedback: Feedback) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "feedback" (id, user_id, title, message)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.user_id)
        .bind(&feedback.title)
        .bind(&feedback.message)
        .execute(&self.pool)
        .await
    }
}
