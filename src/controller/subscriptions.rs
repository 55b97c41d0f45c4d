use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse, Responder, Result};
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    configuration::{AppState, State},
    error::Error,
    helpers::parse_calendar_date,
    model::Subscription,
    types::BillingCycle,
};

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Deserialize, Validate)]
pub struct SubscriptionRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub billing_cycle: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub description: Option<String>,
    pub next_billing_date: String,
    #[validate(length(min = 3, max = 8))]
    pub currency: Option<String>,
    pub auto_renew: Option<bool>,
    pub color: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl SubscriptionRequest {
    /// Validates the free-form fields and normalizes the payload into a row:
    /// billing cycle lowercased and matched against the known set, the
    /// billing date reduced to a plain calendar date.
    fn into_model(
        self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Subscription, Error> {
        let cycle = BillingCycle::from_str(&self.billing_cycle.to_lowercase())
            .map_err(|_| {
                Error::InvalidOption(format!(
                    "billing cycle '{}'",
                    self.billing_cycle
                ))
            })?;

        let next_billing_date = parse_calendar_date(&self.next_billing_date)?;
        let price = BigDecimal::from_str(&self.price.to_string())?;

        Ok(Subscription {
            id,
            user_id,
            name: self.name,
            price,
            billing_cycle: cycle.to_string(),
            category: self.category,
            description: self.description,
            next_billing_date,
            currency: self
                .currency
                .unwrap_or_else(|| String::from(DEFAULT_CURRENCY)),
            auto_renew: self.auto_renew,
            color: self.color,
            logo: self.logo,
            website: self.website,
            notes: self.notes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

#[get("/subscriptions")]
pub async fn index(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
) -> Result<impl Responder, Error> {
    let subscriptions =
        state.database.subscription.get_by_user(user.id).await?;

    Ok(web::Json(subscriptions))
}

#[get("/subscriptions/{id}")]
pub async fn get_one(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, Error> {
    let subscription = state
        .database
        .subscription
        .get_one(path.into_inner(), user.id)
        .await?
        .ok_or_else(|| Error::NotFound(String::from("Not found")))?;

    Ok(web::Json(subscription))
}

#[post("/subscriptions")]
pub async fn create(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    body: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let subscription =
        body.into_inner().into_model(Uuid::new_v4(), user.id)?;
    let id = subscription.id;

    state.database.subscription.insert(subscription).await?;

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: String::from("Subscription created"),
        id,
    }))
}

#[put("/subscriptions/{id}")]
pub async fn update(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let subscription =
        body.into_inner().into_model(path.into_inner(), user.id)?;
    let result = state.database.subscription.update(subscription).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(String::from("Not found")));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("Subscription updated"),
    }))
}

#[delete("/subscriptions/{id}")]
pub async fn remove(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, Error> {
    state
        .database
        .subscription
        .delete(path.into_inner(), user.id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("Subscription deleted"),
    }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}
