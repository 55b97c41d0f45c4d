use actix_web::{get, put, web, HttpResponse, Responder, Result};
use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    configuration::{AppState, State},
    error::Error,
    handler::currency_rates,
    model::User,
};

const DEFAULT_CURRENCY: &str = "USD";

/// Profile shape returned to the frontend; camelCase, never the hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.to_string(),
            email: user.email.to_owned(),
            name: user.name.to_owned(),
            role: user.role.to_owned(),
            avatar_url: user.avatar_url.to_owned(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[get("/user/profile")]
pub async fn get_profile(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
) -> Result<impl Responder, Error> {
    let record = state
        .database
        .user
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| Error::NotFound(String::from("User not found")))?;

    Ok(web::Json(UserResponse::from(&record)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

#[put("/user/profile")]
pub async fn update_profile(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    body: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, Error> {
    body.validate()?;

    let body = body.into_inner();

    if body.name.is_none()
        && body.email.is_none()
        && body.avatar_url.is_none()
        && body.password.is_none()
    {
        return Err(Error::InvalidOption(String::from("no fields to update")));
    }

    let password = match body.password {
        Some(password) => Some(hash(password, DEFAULT_COST)?),
        None => None,
    };

    state
        .database
        .user
        .update_profile(user.id, body.name, body.email, body.avatar_url, password)
        .await?;

    let record = state
        .database
        .user
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| Error::NotFound(String::from("User not found")))?;

    Ok(web::Json(UserResponse::from(&record)))
}

#[get("/user/currency")]
pub async fn get_currency(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
) -> Result<impl Responder, Error> {
    let currency = state
        .database
        .user
        .get_default_currency(user.id)
        .await?
        .unwrap_or_else(|| String::from(DEFAULT_CURRENCY));

    Ok(web::Json(CurrencyResponse { currency }))
}

#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    pub currency: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetCurrencyRequest {
    #[validate(length(min = 3, max = 8))]
    pub currency: String,
}

#[put("/user/currency")]
pub async fn set_currency(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    body: web::Json<SetCurrencyRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    state
        .database
        .user
        .set_default_currency(user.id, &body.currency)
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[get("/user/currencies")]
pub async fn currencies(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let rates = currency_rates::get_all_currencies(state.get_ref()).await?;
    Ok(web::Json(rates))
}
