pub mod test_helpers {
    use axum::Router;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::path::Path;
    use tower_sessions_sqlx_store::SqliteStore;

    use crate::config::{session::SESSION_TABLE, AppConfig, SessionConfig};
    use crate::{routes, AppState};

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        // One connection: every new in-memory connection is a new database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        crate::db::migrate(&pool).await?;

        Ok(pool)
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = crate::services::password::hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;

        let result =
            sqlx::query("INSERT INTO users (email, username, password_hash) VALUES (?, ?, ?)")
                .bind(email)
                .bind(username)
                .bind(password_hash)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    /// Full application router over `pool`, storing uploads in `upload_dir`.
    pub async fn build_test_app(
        pool: SqlitePool,
        upload_dir: &Path,
    ) -> Result<Router, sqlx::Error> {
        let session_store = SqliteStore::new(pool.clone())
            .with_table_name(SESSION_TABLE)
            .map_err(|e| sqlx::Error::Configuration(e.into()))?;
        session_store.migrate().await?;

        let config = AppConfig {
            upload_dir: upload_dir.to_path_buf(),
            ..AppConfig::default()
        };
        let session_layer = SessionConfig::from_env().create_layer(session_store);
        let state = AppState::new(pool, upload_dir);

        Ok(routes::build_router(state, &config, session_layer))
    }
}

// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
