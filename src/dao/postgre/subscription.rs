use super::QueryResult;
use crate::model::{DueSubscription, Subscription, Table};
use chrono::NaiveDate;
use sqlx::error::Error;
use uuid::Uuid;

impl Table<Subscription> {
    pub async fn insert(
        &self,
        subscription: Subscription,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "subscriptions" (
                id, user_id, name, price, billing_cycle, category,
                description, next_billing_date, currency, auto_renew,
                color, logo, website, notes
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(&subscription.name)
        .bind(&subscription.price)
        .bind(&subscription.billing_cycle)
        .bind(&subscription.category)
        .bind(&subscription.description)
        .bind(subscription.next_billing_date)
        .bind(&subscription.currency)
        .bind(subscription.auto_renew)
        .bind(&subscription.color)
        .bind(&subscription.logo)
        .bind(&subscription.website)
        .bind(&subscription.notes)
        .execute(&self.pool)
        .await
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Subscription>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "subscriptions" WHERE user_id = $1
            ORDER BY next_billing_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_one(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "subscriptions" WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        subscription: Subscription,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            UPDATE "subscriptions" SET
                name = $3,
                price = $4,
                billing_cycle = $5,
                category = $6,
                description = $7,
                next_billing_date = $8,
                currency = $9,
                auto_renew = $10,
                color = $11,
                logo = $12,
                website = $13,
                notes = $14,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(&subscription.name)
        .bind(&subscription.price)
        .bind(&subscription.billing_cycle)
        .bind(&subscription.category)
        .bind(&subscription.description)
        .bind(subscription.next_billing_date)
        .bind(&subscription.currency)
        .bind(subscription.auto_renew)
        .bind(&subscription.color)
        .bind(&subscription.logo)
        .bind(&subscription.website)
        .bind(&subscription.notes)
        .execute(&self.pool)
        .await
    }

    pub async fn delete(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "subscriptions" WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
    }

    pub async fn get_categories(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<String>, Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT category FROM "subscriptions"
            WHERE user_id = $1 AND category IS NOT NULL
            ORDER BY category
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(category,)| category).collect())
    }

    /// Subscriptions due today or tomorrow, excluding auto-renewing ones.
    /// A NULL auto_renew counts as false.
    pub async fn get_due(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<DueSubscription>, Error> {
        let tomorrow = today + chrono::Days::new(1);

        sqlx::query_as(
            r#"
            SELECT id, user_id, name, price, logo, next_billing_date
            FROM "subscriptions"
            WHERE next_billing_date BETWEEN $1 AND $2
            AND auto_renew IS NOT TRUE
            "#,
        )
        .bind(today)
        .bind(tomorrow)
        .fetch_all(&self.pool)
        .await
    }
}
