//! Admin API endpoints
//!
//! The notification trigger is authenticated by a shared secret so an
//! external scheduler can call it; everything else requires an admin token.

use actix_web::{
    delete, get, post, put, web, HttpRequest, HttpResponse, Responder, Result,
};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AdminUser,
    configuration::{AppState, State},
    error::Error,
    handler::{
        notify_due::{self, BatchReport, ICON_FALLBACK},
        send_push,
    },
    model::{PopularService, PushSubscription},
    types::{NotificationData, NotificationPayload},
};

// =============================================================================
// Due-subscription notification trigger
// =============================================================================

#[post("/admin/notify-due-subscriptions")]
pub async fn notify_due_subscriptions(
    state: web::Data<AppState<State>>,
    req: HttpRequest,
) -> Result<impl Responder, Error> {
    let secret = req
        .headers()
        .get("x-admin-secret")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Forbidden(String::from("Unauthorized")))?;

    if secret != state.config.admin_secret {
        return Err(Error::Forbidden(String::from("Unauthorized")));
    }

    let report = notify_due::notify_due_subscriptions(state.get_ref()).await?;

    Ok(web::Json(NotifyResponse {
        status: String::from("ok"),
        message: String::from("Notifications sent"),
        report,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub status: String,
    pub message: String,
    pub report: BatchReport,
}

// =============================================================================
// User management
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
) -> Result<impl Responder, Error> {
    let users = state.database.user.get_all().await?;

    let users: Vec<AdminUserResponse> = users
        .into_iter()
        .map(|user| AdminUserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        })
        .collect();

    Ok(web::Json(users))
}

#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, Error> {
    let result = state.database.user.delete(path.into_inner()).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(String::from("User not found")));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("User deleted"),
    }))
}

// =============================================================================
// Content pages
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct PageRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub content: String,
}

#[put("/admin/pages/{id}")]
pub async fn upsert_page(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<PageRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    state
        .database
        .page
        .upsert(&path.into_inner(), &body.title, &body.content)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("Page saved"),
    }))
}

// =============================================================================
// Popular-service presets
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct PopularServiceRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub color: Option<String>,
}

impl PopularServiceRequest {
    fn into_model(self, id: Uuid) -> PopularService {
        PopularService {
            id,
            name: self.name,
            category: self.category,
            logo: self.logo,
            website: self.website,
            color: self.color,
            created_at: Utc::now(),
        }
    }
}

#[post("/admin/popular-services")]
pub async fn create_popular_service(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    body: web::Json<PopularServiceRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let service = body.into_inner().into_model(Uuid::new_v4());
    let id = service.id;

    state.database.popular_service.insert(service).await?;

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: String::from("Popular service created"),
        id,
    }))
}

#[put("/admin/popular-services/{id}")]
pub async fn update_popular_service(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<PopularServiceRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    let service = body.into_inner().into_model(path.into_inner());
    let result = state.database.popular_service.update(service).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(String::from("Popular service not found")));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("Popular service updated"),
    }))
}

#[delete("/admin/popular-services/{id}")]
pub async fn delete_popular_service(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, Error> {
    let result = state
        .database
        .popular_service
        .delete(path.into_inner())
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(String::from("Popular service not found")));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: String::from("Popular service deleted"),
    }))
}

// =============================================================================
// App versions
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct VersionRequest {
    #[validate(length(min = 1))]
    pub version: String,
}

#[post("/admin/version")]
pub async fn publish_version(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    body: web::Json<VersionRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()?;

    state.database.app_version.insert(&body.version).await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: String::from("Version published"),
    }))
}

// =============================================================================
// Broadcast notifications
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct BroadcastRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    pub url: Option<String>,
}

/// Best-effort push to every registered endpoint with bounded concurrency.
/// Per-endpoint failures are counted, never surfaced as errors.
#[post("/admin/broadcast")]
pub async fn broadcast(
    state: web::Data<AppState<State>>,
    _admin: AdminUser,
    body: web::Json<BroadcastRequest>,
) -> Result<impl Responder, Error> {
    body.validate()?;

    let body = body.into_inner();
    let payload = NotificationPayload {
        title: body.title,
        body: body.body,
        icon: String::from(ICON_FALLBACK),
        tag: String::from("broadcast"),
        data: NotificationData {
            url: body.url.unwrap_or_else(|| String::from("/")),
        },
        require_interaction: true,
    };

    let subscriptions = state.database.push_subscription.get_all().await?;
    let attempted = subscriptions.len();
    let max_tasks = state.config.max_tasks;
    let app_state = state.get_ref().clone();

    let results: Vec<bool> = stream::iter(subscriptions)
        .map(|subscription: PushSubscription| {
            let app_state = app_state.clone();
            let payload = payload.clone();
            async move {
                match send_push::send_web_push(&app_state, &subscription, &payload)
                    .await
                {
                    Ok(code) if (200..300).contains(&code) => true,
                    Ok(code) => {
                        warn!(
                            "Broadcast rejected for user {} (status {})",
                            subscription.user_id, code
                        );
                        false
                    },
                    Err(e) => {
                        warn!(
                            "Broadcast failed for user {}: {}",
                            subscription.user_id, e
                        );
                        false
                    },
                }
            }
        })
        .buffer_unordered(max_tasks)
        .collect()
        .await;

    let delivered = results.iter().filter(|ok| **ok).count();

    Ok(web::Json(BroadcastResponse {
        attempted,
        delivered,
        failed: attempted - delivered,
    }))
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
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
