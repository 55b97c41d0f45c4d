use actix_web::{get, web, Responder, Result};

use crate::{
    auth::AuthenticatedUser,
    configuration::{AppState, State},
    error::Error,
    helpers::merge_categories,
};

pub const BUILTIN_CATEGORIES: &[&str] = &[
    "music",
    "entertainment",
    "shopping",
    "software",
    "productivity",
    "health",
    "fitness",
    "education",
    "news",
    "finance",
    "utilities",
    "other",
];

#[get("/categories")]
pub async fn index(
    state: web::Data<AppState<State>>,
    user: AuthenticatedUser,
) -> Result<impl Responder, Error> {
    let custom = state.database.subscription.get_categories(user.id).await?;

    Ok(web::Json(merge_categories(BUILTIN_CATEGORIES, custom)))
}
