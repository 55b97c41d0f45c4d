use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/pages/{id}")]
pub async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let page = state
        .database
        .page
        .get_one(&path.into_inner())
        .await?
        .ok_or_else(|| Error::NotFound(String::from("Page not found")))?;

    Ok(web::Json(page))
}
