use crate::auth::session::{self, home_path};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::handlers::found;
use crate::services::{
    auth_service::{AuthServiceError, LoginRequest},
    user_service::SignupRequest,
};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    flashes: Vec<Flash>,
    error: Option<String>,
    email: String,
}

#[derive(Template)]
#[template(path = "auth/signup.html")]
struct SignupTemplate {
    flashes: Vec<Flash>,
    error: Option<String>,
    email: String,
    username: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default, rename = "cfpassword", alias = "password_confirm")]
    password_confirm: String,
}

/// GET / - login form
pub async fn login_page(session: Session) -> Result<Response, AppError> {
    let template = LoginTemplate {
        flashes: flash::take(&session).await?,
        error: None,
        email: String::new(),
    };
    Ok(Html(template.render()?).into_response())
}

/// POST / - credential submission
pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let request = LoginRequest {
        email: form.email.clone(),
        password: form.password,
    };

    match app_state.auth_service.authenticate(request).await {
        Ok(user) => {
            session::start(&session, user.id).await?;
            flash::push(&session, Flash::success("Logged in successfully")).await?;
            tracing::info!(user_id = user.id, "User logged in");
            Ok(found(&home_path(user.id)))
        }
        Err(AuthServiceError::InvalidCredentials) => {
            tracing::debug!("Rejected login attempt");
            login_error("Invalid credentials", form.email)
        }
        Err(e) => Err(e.into()),
    }
}

fn login_error(msg: &str, email: String) -> Result<Response, AppError> {
    let template = LoginTemplate {
        flashes: Vec::new(),
        error: Some(msg.to_string()),
        email,
    };
    Ok(Html(template.render()?).into_response())
}

/// GET /signup - empty signup form
pub async fn signup_page(session: Session) -> Result<Response, AppError> {
    let template = SignupTemplate {
        flashes: flash::take(&session).await?,
        error: None,
        email: String::new(),
        username: String::new(),
    };
    Ok(Html(template.render()?).into_response())
}

/// POST /signup - account creation
///
/// Validation failures re-render the form with the first failing rule's
/// message; success signs the new user in and sends them home.
pub async fn signup_handler(
    State(app_state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let request = SignupRequest {
        email: form.email.clone(),
        username: form.username.clone(),
        password: form.password,
        password_confirm: form.password_confirm,
    };

    match app_state.user_service.register(request).await {
        Ok(user) => {
            session::start(&session, user.id).await?;
            flash::push(&session, Flash::success("Account created successfully")).await?;
            Ok(found(&home_path(user.id)))
        }
        Err(err) if err.is_validation() => {
            let template = SignupTemplate {
                flashes: Vec::new(),
                error: Some(err.to_string()),
                email: form.email,
                username: form.username,
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// GET /logout - always 302 back to the login form
pub async fn logout_handler(session: Session) -> Response {
    if let Err(e) = session::end(&session).await {
        tracing::warn!("Failed to clear session on logout: {}", e);
    }
    found("/")
}
