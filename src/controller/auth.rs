use actix_web::{post, web, HttpResponse, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{create_token, ROLE_USER},
    configuration::{AppState, State},
    controller::user::UserResponse,
    error::Error,
    model::User,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
}

#[post("/auth/register")]
pub async fn register(
    state: web::Data<AppState<State>>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let existing = state.database.user.get_by_email(&body.email).await?;

    if existing.is_some() {
        return Err(Error::Conflict(String::from("User already exists")));
    }

    let hashed = hash(&body.password, DEFAULT_COST)?;
    let user = User {
        id: Uuid::new_v4(),
        email: body.email.to_owned(),
        password: hashed,
        name: body.name.to_owned(),
        avatar_url: None,
        role: String::from(ROLE_USER),
        default_currency: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    state.database.user.insert(user).await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: String::from("User registered"),
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState<State>>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let user = state
        .database
        .user
        .get_by_email(&body.email)
        .await?
        .ok_or_else(|| {
            Error::Unauthorized(String::from("Invalid credentials"))
        })?;

    if !verify(&body.password, &user.password)? {
        return Err(Error::Unauthorized(String::from("Invalid credentials")));
    }

    let token = create_token(
        &user,
        &state.config.jwt_secret,
        state.config.jwt_expiry_days,
    )?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
