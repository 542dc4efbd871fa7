use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Path stored for users who have not uploaded a picture.
pub const PLACEHOLDER_PICTURE: &str = "public/unknown.png";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: String,
    pub profession: String,
    pub profile_pic: String,
    pub created_at: Option<String>,
}

impl User {
    pub fn has_custom_picture(&self) -> bool {
        self.profile_pic != PLACEHOLDER_PICTURE
    }

    /// URL the browser should load the picture from.
    pub fn picture_url(&self) -> String {
        format!("/{}", self.profile_pic.trim_start_matches('/'))
    }
}

/// Column values for a freshly validated signup.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Editable profile columns. `password_hash` is only written when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChanges {
    pub email: String,
    pub username: String,
    pub bio: String,
    pub profession: String,
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_picture(path: &str) -> User {
        User {
            id: 1,
            email: "u1@gmail.com".to_string(),
            username: "user1".to_string(),
            password_hash: "hash".to_string(),
            bio: String::new(),
            profession: String::new(),
            profile_pic: path.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn placeholder_is_not_custom() {
        let user = user_with_picture(PLACEHOLDER_PICTURE);
        assert!(!user.has_custom_picture());
        assert_eq!(user.picture_url(), "/public/unknown.png");
    }

    #[test]
    fn uploaded_picture_is_custom() {
        let user = user_with_picture("uploads/1-abc.jpg");
        assert!(user.has_custom_picture());
        assert_eq!(user.picture_url(), "/uploads/1-abc.jpg");
    }
}
