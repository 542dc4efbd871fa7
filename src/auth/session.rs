use tower_sessions::{session::Error, Session};

pub const USER_ID_KEY: &str = "user_id";

/// Id of the signed-in user, if any. The session never holds more than that.
pub async fn current_user_id(session: &Session) -> Result<Option<i64>, Error> {
    session.get::<i64>(USER_ID_KEY).await
}

/// Binds the session to `user_id` under a fresh session id.
pub async fn start(session: &Session, user_id: i64) -> Result<(), Error> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await
}

pub async fn end(session: &Session) -> Result<(), Error> {
    session.flush().await
}

pub fn home_path(user_id: i64) -> String {
    format!("/home/{}", user_id)
}
