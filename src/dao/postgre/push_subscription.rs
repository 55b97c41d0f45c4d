use super::QueryResult;
use crate::model::{PushSubscription, Table};
use sqlx::error::Error;
use uuid::Uuid;

impl Table<PushSubscription> {
    /// Re-subscribing with the same endpoint replaces the stored keys.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "push_subscriptions" (user_id, endpoint, p256dh, auth)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (user_id, endpoint)
            DO UPDATE SET p256dh = EXCLUDED.p256dh, auth = EXCLUDED.auth
            "#,
        )
        .bind(user_id)
        .bind(endpoint)
        .bind(p256dh)
        .bind(auth)
        .execute(&self.pool)
        .await
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        endpoint: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "push_subscriptions"
            WHERE user_id = $1 AND endpoint = $2
            "#,
        )
        .bind(user_id)
        .bind(endpoint)
        .execute(&self.pool)
        .await
    }

    pub async fn delete_by_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "push_subscriptions" WHERE endpoint = $1
            "#,
        )
        .bind(endpoint)
        .execute(&self.pool)
        .await
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PushSubscription>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "push_subscriptions" WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_all(&self) -> Result<Vec<PushSubscription>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "push_subscriptions"
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
