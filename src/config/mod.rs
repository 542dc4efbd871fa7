pub mod app;
pub mod session;

pub use app::AppConfig;
pub use session::{validate_production_config, SessionConfig, SessionLayer};
