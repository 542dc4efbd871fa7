pub mod auth_service;
pub mod password;
pub mod upload_service;
pub mod user_service;
pub mod validation;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use upload_service::{UploadError, UploadService};
pub use user_service::{UserService, UserServiceError};
