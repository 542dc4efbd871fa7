pub mod home_handlers;
pub mod profile_form;
pub mod profile_handlers;
pub mod shop_handlers;

pub use home_handlers::home_handler;
pub use profile_handlers::{show_profile, show_profile_by_id, update_profile, update_profile_by_id};
pub use shop_handlers::{cart_page, products_page};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// 302 Found, the status browsers and the login flow expect for redirects.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
