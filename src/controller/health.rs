use actix_web::{get, web, Responder};
use chrono::Utc;
use serde::Serialize;

use crate::error::Error;

#[get("/health")]
pub async fn index() -> Result<impl Responder, Error> {
    Ok(web::Json(Response {
        status: "ok",
        time: Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub status: &'static str,
    pub time: String,
}
