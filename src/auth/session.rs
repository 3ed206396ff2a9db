use actix_session::{
    Session, SessionMiddleware,
    config::{PersistentSession, TtlExtensionPolicy},
};
use actix_web::cookie::{Key, time::Duration};

use crate::auth::session_store::DbSessionStore;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::User;

pub const SESSION_COOKIE: &str = "huxley_session";
const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID_KEY).unwrap_or(None)
}

/// Start an authenticated session for `user`. The session id is rotated first
/// so an id planted before login cannot be reused afterwards.
pub fn log_in(session: &Session, user: &User) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID_KEY, user.id)
        .and_then(|_| session.insert(USERNAME_KEY, &user.username))
        .map_err(|e| AppError::Session(e.to_string()))
}

/// Drop the user from the session but keep the session itself alive.
pub fn forget_user(session: &Session) {
    session.remove(USER_ID_KEY);
    session.remove(USERNAME_KEY);
}

/// Destroy the session, authenticated or not. The middleware deletes the
/// stored state and expires the cookie.
pub fn log_out(session: &Session) {
    session.purge();
}

/// Session middleware backed by the database session table.
pub fn middleware(
    pool: DbPool,
    key: Key,
    cookie_secure: bool,
    ttl_secs: i64,
) -> SessionMiddleware<DbSessionStore> {
    SessionMiddleware::builder(DbSessionStore::new(pool), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(Duration::seconds(ttl_secs))
                .session_ttl_extension_policy(TtlExtensionPolicy::OnStateChanges),
        )
        .build()
}
