//! JSON request and response bodies for the REST API.
//!
//! Each operation has its own request type; full and partial updates are
//! told apart by `Update` rather than by inspecting the HTTP method inside a
//! shared handler.

pub mod assignment;
pub mod delegate;
pub mod school;
pub mod user;

use serde::{Deserialize, Serialize};

pub use assignment::*;
pub use delegate::*;
pub use school::*;
pub use user::*;

/// Generic paginated response wrapper for list endpoints.
#[derive(Serialize, Debug, Clone)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// `?page=&per_page=` query parameters.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    25
}

/// Combine a request body with the stored record to produce the new values.
pub trait Merge<Current> {
    type Output;

    fn merge(self, current: &Current) -> Self::Output;
}

/// A PUT body (`Full`) or a PATCH body (`Partial`).
#[derive(Debug)]
pub enum Update<F, P> {
    Full(F),
    Partial(P),
}

impl<F, P> Update<F, P> {
    /// Resolve the update against `current`. Full updates replace every
    /// writable field; partial updates keep whatever the body leaves out.
    pub fn apply<C, O>(self, current: &C) -> O
    where
        F: Merge<C, Output = O>,
        P: Merge<C, Output = O>,
    {
        match self {
            Update::Full(body) => body.merge(current),
            Update::Partial(body) => body.merge(current),
        }
    }
}
