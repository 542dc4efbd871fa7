pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::{path::Path, sync::Arc};

use repositories::{SqliteUserRepository, UserRepository};
use services::{AuthService, UploadService, UserService};

/// Shared handles passed to every handler through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub upload_service: Arc<UploadService>,
}

impl AppState {
    pub fn new(pool: sqlx::SqlitePool, upload_dir: impl AsRef<Path>) -> Self {
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository)),
            upload_service: Arc::new(UploadService::new(upload_dir.as_ref())),
        }
    }
}
