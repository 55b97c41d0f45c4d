use actix_web::{get, web, Responder};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/version")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let version = state
        .database
        .app_version
        .get_latest()
        .await?
        .ok_or_else(|| Error::NotFound(String::from("No version found")))?;

    Ok(web::Json(version))
}
