use crate::models::user::{NewUser, ProfileChanges, User};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("User not found")]
    NotFound,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Username already exists")]
    DuplicateUsername,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn update_profile(&self, id: i64, changes: &ProfileChanges) -> RepositoryResult<()>;
    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()>;
    /// Points the picture at `path` and returns the path it replaced.
    async fn swap_profile_pic(&self, id: i64, path: &str) -> RepositoryResult<String>;
    /// Removes the row and returns it as it was.
    async fn delete_user(&self, id: i64) -> RepositoryResult<User>;
    async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<User>>;
}

const USER_COLUMNS: &str =
    "id, email, username, password_hash, bio, profession, profile_pic, created_at";

/// Maps UNIQUE constraint failures onto the column that caused them.
fn classify_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return if db_err.message().contains("users.username") {
                RepositoryError::DuplicateUsername
            } else {
                RepositoryError::DuplicateEmail
            };
        }
    }
    RepositoryError::Database(err)
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (email, username, password_hash) VALUES (?, ?, ?)",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(classify_write_error)?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.find_one("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.find_one("username", username).await
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: i64, changes: &ProfileChanges) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?, username = ?, bio = ?, profession = ?,
                password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            "#,
        )
        .bind(&changes.email)
        .bind(&changes.username)
        .bind(&changes.bio)
        .bind(&changes.profession)
        .bind(&changes.password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn swap_profile_pic(&self, id: i64, path: &str) -> RepositoryResult<String> {
        // Compare-and-swap: a concurrent writer makes the guarded UPDATE miss,
        // so every caller gets back a distinct previous path.
        loop {
            let previous: String =
                sqlx::query_scalar("SELECT profile_pic FROM users WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;

            let result = sqlx::query(
                "UPDATE users SET profile_pic = ? WHERE id = ? AND profile_pic = ?",
            )
            .bind(path)
            .bind(id)
            .bind(&previous)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(previous);
            }
        }
    }

    async fn delete_user(&self, id: i64) -> RepositoryResult<User> {
        let sql = format!("DELETE FROM users WHERE id = ? RETURNING {}", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<User>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let sql = format!(
            "SELECT {} FROM users ORDER BY id ASC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
