pub mod user;

pub use user::{NewUser, ProfileChanges, User, PLACEHOLDER_PICTURE};
