use profilehub::{
    config::{
        session::{validate_production_config, SESSION_TABLE},
        AppConfig, SessionConfig,
    },
    db, routes, AppState,
};

use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "profilehub=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    validate_production_config()?;

    // Database connection
    let pool = db::create_pool().await?;
    db::migrate(&pool).await?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let app_state = AppState::new(pool.clone(), &config.upload_dir);

    // Session store
    let session_store = SqliteStore::new(pool)
        .with_table_name(SESSION_TABLE)
        .map_err(anyhow::Error::msg)?;
    session_store.migrate().await?;
    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let app = routes::build_router(app_state, &config, session_layer);

    let addr = config.socket_addr();
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
