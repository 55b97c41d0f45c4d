use super::DataBase;
use crate::model::{CurrencyRate, Table};
use chrono::{DateTime, Utc};
use sqlx::{error::Error, QueryBuilder};

impl Table<CurrencyRate> {
    pub async fn get_all(&self) -> Result<Vec<CurrencyRate>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "currencies" ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn last_updated(
        &self,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        let (value,): (Option<DateTime<Utc>>,) = sqlx::query_as(
            r#"
            SELECT MAX(last_updated) FROM "currencies"
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    pub async fn upsert_many(
        &self,
        rates: &Vec<CurrencyRate>,
    ) -> Result<(), Error> {
        if rates.is_empty() {
            return Ok(());
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            INSERT INTO "currencies" (code, name, rate_to_usd, last_updated)
            "#,
        );

        query_builder.push_values(rates, |mut b, rate| {
            b.push_bind(&rate.code)
                .push_bind(&rate.name)
                .push_bind(&rate.rate_to_usd)
                .push_bind(rate.last_updated);
        });

        query_builder.push(
            r#"
            ON CONFLICT (code)
            DO UPDATE SET name = EXCLUDED.name,
                rate_to_usd = EXCLUDED.rate_to_usd,
                last_updated = EXCLUDED.last_updated
            "#,
        );

        let query = query_builder.build();
        query.execute(&self.pool).await?;

        Ok(())
    }
}
