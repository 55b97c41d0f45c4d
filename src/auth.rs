//! User token handling
//!
//! HS256 bearer tokens carrying the user id, email and role, plus the
//! actix extractors that gate authenticated and admin-only routes.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::User,
};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_token(
    user: &User,
    secret: &str,
    expiry_days: i64,
) -> Result<String, Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.to_owned(),
        role: user.role.to_owned(),
        exp: now + expiry_days * 24 * 60 * 60,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<AppState<State>>>()
        .ok_or_else(|| {
            Error::ServerError(String::from("application state missing"))
        })?;

    let header = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            Error::Unauthorized(String::from("Missing authorization header"))
        })?;

    let token = header.trim_start_matches("Bearer ").trim();
    let claims = verify_token(token, &state.config.jwt_secret)
        .map_err(|_| Error::Unauthorized(String::from("Invalid token")))?;

    let id = Uuid::parse_str(&claims.sub).map_err(|_| {
        Error::Unauthorized(String::from("Invalid token subject"))
    })?;

    Ok(AuthenticatedUser {
        id,
        email: claims.email,
        role: claims.role,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<AdminUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req).and_then(|user| {
            if user.role == ROLE_ADMIN {
                Ok(AdminUser(user))
            } else {
                Err(Error::Forbidden(String::from("Admin access required")))
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: String::from("user@example.com"),
            password: String::from("hash"),
            name: String::from("Test User"),
            avatar_url: None,
            role: String::from(ROLE_USER),
            default_currency: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = test_user();
        let token = create_token(&user, "secret", 7).unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, ROLE_USER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let user = test_user();
        let token = create_token(&user, "secret", 7).unwrap();

        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = test_user();
        let token = create_token(&user, "secret", -1).unwrap();

        assert!(verify_token(&token, "secret").is_err());
    }
}
