use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware,
    routing::get,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{self, handlers as auth_handlers};
use crate::config::{AppConfig, SessionLayer};
use crate::handlers;
use crate::middleware::add_security_headers;
use crate::services::upload_service::UPLOAD_URL_PREFIX;
use crate::AppState;

/// Assembles the full application: public auth pages, member pages behind
/// the session gate, static assets and the shared layers.
pub fn build_router(state: AppState, config: &AppConfig, session_layer: SessionLayer) -> Router {
    let member_routes = Router::new()
        .route("/home/{id}", get(handlers::home_handler))
        .route(
            "/profile",
            get(handlers::show_profile).post(handlers::update_profile),
        )
        .route(
            "/profile/{id}",
            get(handlers::show_profile_by_id).post(handlers::update_profile_by_id),
        )
        .route("/products", get(handlers::products_page))
        .route("/cart", get(handlers::cart_page))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    let guest_only =
        middleware::from_fn_with_state(state.clone(), auth::redirect_if_authenticated);

    Router::new()
        .route(
            "/",
            get(auth_handlers::login_page.layer(guest_only.clone()))
                .post(auth_handlers::login_handler),
        )
        .route(
            "/signup",
            get(auth_handlers::signup_page.layer(guest_only))
                .post(auth_handlers::signup_handler),
        )
        .route("/logout", get(auth_handlers::logout_handler))
        .merge(member_routes)
        // Static files
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .nest_service(
            &format!("/{}", UPLOAD_URL_PREFIX),
            ServeDir::new(&config.upload_dir),
        )
        // Layers
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
