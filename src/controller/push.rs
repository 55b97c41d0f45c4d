use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthenticatedUser,
    configuration::{AppState, State},
    error::Error,
    types::PushSubscriptionRequest,
};

#[post("/push/subscribe")]
pub async fn subscribe(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    body: web::Json<PushSubscriptionRequest>,
) -> Result<HttpResponse, Error> {
    state
        .database
        .push_subscription
        .upsert(user.id, &body.endpoint, &body.keys.p256dh, &body.keys.auth)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: String::from("Push subscription registered"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

#[post("/push/unsubscribe")]
pub async fn unsubscribe(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
    body: web::Json<UnsubscribeRequest>,
) -> Result<HttpResponse, Error> {
    state
        .database
        .push_subscription
        .delete(user.id, &body.endpoint)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("Push subscription removed"),
    }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
