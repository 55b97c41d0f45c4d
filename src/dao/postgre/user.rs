use super::QueryResult;
use crate::model::{Table, User};
use sqlx::error::Error;
use uuid::Uuid;

impl Table<User> {
    pub async fn insert(&self, user: User) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "users" (id, email, password, name, avatar_url, role)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .bind(&user.role)
        .execute(&self.pool)
        .await
    }

    pub async fn get_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "users" WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "users" WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        avatar_url: Option<String>,
        password: Option<String>,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            UPDATE "users" SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                avatar_url = COALESCE($4, avatar_url),
                password = COALESCE($5, password),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(avatar_url)
        .bind(password)
        .execute(&self.pool)
        .await
    }

    pub async fn get_default_currency(
        &self,
        id: Uuid,
    ) -> Result<Option<String>, Error> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT default_currency FROM "users" WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|(currency,)| currency))
    }

    pub async fn set_default_currency(
        &self,
        id: Uuid,
        currency: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            UPDATE "users" SET default_currency = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(currency)
        .execute(&self.pool)
        .await
    }

    pub async fn get_all(&self) -> Result<Vec<User>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "users" ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "users" WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
    }
}
