use std::fmt;

use crate::auth::password;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, User};

/// Why a username/password pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    MissingFields,
    InvalidCredentials,
    InactiveAccount,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationError::MissingFields => write!(f, "One or more of the fields is blank."),
            AuthenticationError::InvalidCredentials => {
                write!(f, "The credentials you provided are invalid.")
            }
            AuthenticationError::InactiveAccount => write!(f, "Your account is inactive."),
        }
    }
}

impl From<AuthenticationError> for AppError {
    fn from(e: AuthenticationError) -> Self {
        AppError::AuthenticationFailed(e.to_string())
    }
}

/// Verify a username/password pair against the stored hash.
///
/// Unknown users and wrong passwords produce the same error. The inactive
/// check runs only after the password matched, so it does not reveal which
/// accounts exist.
pub async fn authenticate(pool: &DbPool, username: &str, pass: &str) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() || pass.is_empty() {
        return Err(AuthenticationError::MissingFields.into());
    }

    let Some(found) = user::find_by_username(pool, username).await? else {
        return Err(AuthenticationError::InvalidCredentials.into());
    };
    if !password::verify_password(pass, &found.password)? {
        return Err(AuthenticationError::InvalidCredentials.into());
    }
    if !found.is_active {
        return Err(AuthenticationError::InactiveAccount.into());
    }
    Ok(found)
}
