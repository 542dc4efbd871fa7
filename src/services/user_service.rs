use crate::models::user::{NewUser, ProfileChanges, User, PLACEHOLDER_PICTURE};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::password;
use crate::services::validation::{is_valid_email, is_valid_password, is_valid_username};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error("User name must be greater than 1 character")]
    UsernameTooShort,
    #[error("Password must be at least 7 characters")]
    WeakPassword,
    #[error("Email already exists")]
    EmailTaken,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("User not found")]
    UserNotFound,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(RepositoryError),
}

impl UserServiceError {
    /// Errors caused by the submitted form rather than by the server.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UserServiceError::InvalidEmail
                | UserServiceError::UsernameTooShort
                | UserServiceError::WeakPassword
                | UserServiceError::EmailTaken
                | UserServiceError::UsernameTaken
                | UserServiceError::PasswordMismatch
        )
    }
}

impl From<RepositoryError> for UserServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => UserServiceError::EmailTaken,
            RepositoryError::DuplicateUsername => UserServiceError::UsernameTaken,
            RepositoryError::NotFound => UserServiceError::UserNotFound,
            other => UserServiceError::RepositoryError(other),
        }
    }
}

pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

pub struct ProfileUpdateRequest {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub bio: String,
    pub profession: String,
    /// Empty or absent keeps the current password.
    pub password: Option<String>,
}

pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
    pub new_password_confirm: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Validates a signup and creates the account.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// email format, username length, password length, email uniqueness,
    /// username uniqueness, then password confirmation.
    pub async fn register(&self, request: SignupRequest) -> Result<User, UserServiceError> {
        let email = request.email.trim();
        let username = request.username.trim();

        if !is_valid_email(email) {
            return Err(UserServiceError::InvalidEmail);
        }
        if !is_valid_username(username) {
            return Err(UserServiceError::UsernameTooShort);
        }
        if !is_valid_password(&request.password) {
            return Err(UserServiceError::WeakPassword);
        }
        if self.repository.find_by_email(email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }
        if self.repository.find_by_username(username).await?.is_some() {
            return Err(UserServiceError::UsernameTaken);
        }
        if request.password != request.password_confirm {
            return Err(UserServiceError::PasswordMismatch);
        }

        let new_user = NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: self.hash_password(&request.password)?,
        };

        // A racing signup can still trip the UNIQUE constraints; From maps those.
        let user = self.repository.create_user(&new_user).await?;
        tracing::info!(user_id = user.id, "Registered new user");
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    /// Returns the removed account so its picture can be cleaned up.
    pub async fn delete_user(&self, id: i64) -> Result<User, UserServiceError> {
        let user = self.repository.delete_user(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(user)
    }

    /// Overwrites the editable profile fields and returns the stored record.
    pub async fn update_profile(
        &self,
        request: ProfileUpdateRequest,
    ) -> Result<User, UserServiceError> {
        let email = request.email.trim();
        let username = request.username.trim();
        let new_password = request.password.as_deref().filter(|p| !p.is_empty());

        if !is_valid_email(email) {
            return Err(UserServiceError::InvalidEmail);
        }
        if !is_valid_username(username) {
            return Err(UserServiceError::UsernameTooShort);
        }
        if let Some(pw) = new_password {
            if !is_valid_password(pw) {
                return Err(UserServiceError::WeakPassword);
            }
        }

        // Keeping your own email or username is not a conflict.
        if let Some(existing) = self.repository.find_by_email(email).await? {
            if existing.id != request.user_id {
                return Err(UserServiceError::EmailTaken);
            }
        }
        if let Some(existing) = self.repository.find_by_username(username).await? {
            if existing.id != request.user_id {
                return Err(UserServiceError::UsernameTaken);
            }
        }

        let password_hash = new_password
            .map(|pw| self.hash_password(pw))
            .transpose()?;

        let changes = ProfileChanges {
            email: email.to_string(),
            username: username.to_string(),
            bio: request.bio.trim().to_string(),
            profession: request.profession.trim().to_string(),
            password_hash,
        };
        self.repository
            .update_profile(request.user_id, &changes)
            .await?;

        tracing::info!(user_id = request.user_id, "Profile updated");

        self.repository
            .find_by_id(request.user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserServiceError> {
        if !is_valid_password(&request.new_password) {
            return Err(UserServiceError::WeakPassword);
        }

        if let Some(ref confirm) = request.new_password_confirm {
            if request.new_password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        let password_hash = self.hash_password(&request.new_password)?;
        Ok(self
            .repository
            .update_password(request.user_id, &password_hash)
            .await?)
    }

    /// Points the user's picture at `path` and returns the previous path.
    pub async fn set_profile_picture(
        &self,
        user_id: i64,
        path: &str,
    ) -> Result<String, UserServiceError> {
        Ok(self.repository.swap_profile_pic(user_id, path).await?)
    }

    /// Resets the picture to the placeholder and returns the previous path.
    pub async fn reset_profile_picture(&self, user_id: i64) -> Result<String, UserServiceError> {
        self.set_profile_picture(user_id, PLACEHOLDER_PICTURE).await
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        password::hash_password(password).map_err(|e| UserServiceError::HashingError(e.to_string()))
    }
}
