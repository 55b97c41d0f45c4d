use super::QueryResult;
use crate::model::{PopularService, Table};
use sqlx::error::Error;
use uuid::Uuid;

impl Table<PopularService> {
    pub async fn get_all(&self) -> Result<Vec<PopularService>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "popular_services" ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert(
        &self,
        service: PopularService,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "popular_services" (id, name, category, logo, website, color)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.category)
        .bind(&service.logo)
        .bind(&service.website)
        .bind(&service.color)
        .execute(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        service: PopularService,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            UPDATE "popular_services" SET
                name = $2,
                category = $3,
                logo = $4,
                website = $5,
                color = $6
            WHERE id = $1
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.category)
        .bind(&service.logo)
        .bind(&service.website)
        .bind(&service.color)
        .execute(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "popular_services" WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
    }
}
