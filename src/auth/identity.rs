use std::future::Future;
use std::pin::Pin;

use actix_session::SessionExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::auth::session::{forget_user, get_user_id};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, User};

/// The caller of the current request, resolved from the session.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    User(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Anonymous => None,
            Identity::User(u) => Some(u),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn require_user(&self) -> Result<&User, AppError> {
        self.user().ok_or(AppError::NotAuthenticated)
    }
}

/// Loads the session's user on every request. A session pointing at a user
/// that no longer exists, or has been deactivated, is stripped of its user id
/// and the caller is treated as anonymous.
impl FromRequest for Identity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        let pool = req.app_data::<web::Data<DbPool>>().cloned();

        Box::pin(async move {
            let Some(user_id) = get_user_id(&session) else {
                return Ok(Identity::Anonymous);
            };
            let pool = pool.ok_or_else(|| AppError::Session("Database pool not configured".to_string()))?;
            match user::find_by_id(&pool, user_id).await? {
                Some(u) if u.is_active => Ok(Identity::User(u)),
                _ => {
                    log::warn!("Dropping session for missing or inactive user {user_id}");
                    forget_user(&session);
                    Ok(Identity::Anonymous)
                }
            }
        })
    }
}
