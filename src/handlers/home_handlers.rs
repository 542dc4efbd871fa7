use crate::auth::{session::home_path, CurrentUser};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::handlers::found;
use crate::models::user::User;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Path,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
struct HomeTemplate {
    flashes: Vec<Flash>,
    user: User,
}

/// GET /home/{id} - landing page after login or signup
pub async fn home_handler(
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if id != user.id {
        return Ok(found(&home_path(user.id)));
    }

    let template = HomeTemplate {
        flashes: flash::take(&session).await?,
        user,
    };
    Ok(template.into_response())
}
