use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    configuration::{AppState, State},
    error::Error,
    model::Feedback,
};

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
}

// Works with or without a token; a valid one attaches the sender.
#[post("/send-feedback")]
pub async fn index(
    state: web::Data<AppState<State>>,
    user: Option<AuthenticatedUser>,
    body: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let body = body.into_inner();
    let feedback = Feedback {
        id: Uuid::new_v4(),
        user_id: user.map(|u| u.id),
        title: body.title,
        message: body.message,
        created_at: chrono::Utc::now(),
    };

    state.database.feedback.insert(feedback).await?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
