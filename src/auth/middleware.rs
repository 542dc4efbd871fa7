use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::auth::session::{current_user_id, home_path};
use crate::error::AppError;
use crate::handlers::found;
use crate::models::user::User;
use crate::services::AuthServiceError;
use crate::AppState;

/// The signed-in user, loaded once per request by [`require_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Resolves the session to a live account. A session naming an account
/// that no longer exists is flushed and treated as signed out.
async fn session_user(state: &AppState, session: &Session) -> Result<Option<User>, AppError> {
    let Some(user_id) = current_user_id(session).await? else {
        return Ok(None);
    };

    match state.auth_service.get_user_by_id(user_id).await {
        Ok(user) => Ok(Some(user)),
        Err(AuthServiceError::UserNotFound) => {
            tracing::warn!(user_id, "Session refers to a missing user; clearing it");
            if let Err(e) = session.flush().await {
                tracing::warn!(user_id, "Failed to clear stale session: {}", e);
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Gate for member pages: answers 401 instead of redirecting to the login form.
pub async fn require_user(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    match session_user(&state, &session).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => AppError::Unauthorized.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Keeps signed-in users away from the login and signup forms.
pub async fn redirect_if_authenticated(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    match session_user(&state, &session).await {
        Ok(Some(user)) => found(&home_path(user.id)),
        Ok(None) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}
