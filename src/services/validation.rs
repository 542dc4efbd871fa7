//! Input rules shared by signup and profile editing.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_USERNAME_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 7;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 255 && EMAIL_PATTERN.is_match(email)
}

/// Usernames need more than one character.
pub fn is_valid_username(username: &str) -> bool {
    username.chars().count() >= MIN_USERNAME_CHARS
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}
