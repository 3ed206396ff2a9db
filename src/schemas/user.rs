use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::{User, UserChanges, UserDisplay};
use super::Merge;

/// Public user representation. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_superuser: bool,
    pub school: Option<i64>,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserDisplay> for UserResponse {
    fn from(u: UserDisplay) -> Self {
        UserResponse {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            is_superuser: u.is_superuser,
            school: u.school_id,
            date_joined: u.date_joined,
            last_login: u.last_login,
        }
    }
}

/// Registration body. Only used for `POST /users`.
#[derive(Deserialize, Debug)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct UserReplaceRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct UserPatchRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Superusers only.
    pub is_active: Option<bool>,
}

impl Merge<User> for UserReplaceRequest {
    type Output = UserChanges;

    fn merge(self, _current: &User) -> UserChanges {
        UserChanges {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

impl Merge<User> for UserPatchRequest {
    type Output = UserChanges;

    fn merge(self, current: &User) -> UserChanges {
        UserChanges {
            first_name: self
                .first_name
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| current.first_name.clone()),
            last_name: self
                .last_name
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| current.last_name.clone()),
            email: self
                .email
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| current.email.clone()),
        }
    }
}
