use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role: String,
    pub default_currency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub billing_cycle: String,
    pub category: String,
    pub description: Option<String>,
    pub next_billing_date: NaiveDate,
    pub currency: String,
    pub auto_renew: Option<bool>,
    pub color: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape returned by the due-subscription query. Auto-renewing rows are
/// filtered out in SQL and `next_billing_date` is a plain calendar date.
#[derive(Debug, Clone, FromRow)]
pub struct DueSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub logo: Option<String>,
    pub next_billing_date: NaiveDate,
}

#[derive(Debug, Clone, FromRow)]
pub struct PushSubscription {
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PopularService {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CurrencyRate {
    pub code: String,
    pub name: String,
    pub rate_to_usd: BigDecimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppVersion {
    pub id: i32,
    pub version: String,
    pub released_at: DateTime<Utc>,
}
