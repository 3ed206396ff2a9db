//! Shared test infrastructure.
//!
//! # Test Database Setup
//! - `setup_test_db()` - Private in-memory database with the schema applied
//!
//! # Fixtures
//! - `new_user`, `new_superuser`, `new_school`, `new_assignment`, `new_delegate`
//!
//! # HTTP helpers
//! - `test_app!(pool)` - The `/api` service with sessions, ready for `call_service`
//! - `login!(app, username)`, `api_request`, `session_cookie`
#![allow(dead_code, unused_macros)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::Method;
use actix_web::test::TestRequest;

use huxley::auth::password;
use huxley::auth::session::SESSION_COOKIE;
use huxley::db::{self, DbPool};
use huxley::models::assignment::{self, Assignment, NewAssignment};
use huxley::models::delegate::{self, Delegate, NewDelegate};
use huxley::models::school::{self, School, SchoolFields};
use huxley::models::user::{self, NewUser, User};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_PASS: &str = "test_password";

// ============================================================================
// DATABASE SETUP
// ============================================================================

/// Keeps the in-memory database alive for the duration of a test.
pub struct TestDb {
    pool: DbPool,
}

impl TestDb {
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Setup a fresh database with the schema applied. Nothing is seeded.
pub async fn setup_test_db() -> TestDb {
    let pool = db::init_memory_pool().await.expect("Failed to open test DB");
    db::run_migrations(&pool).await.expect("Failed to run migrations");
    TestDb { pool }
}

// ============================================================================
// FIXTURES
// ============================================================================

async fn insert_user(pool: &DbPool, username: &str, is_superuser: bool) -> User {
    let hash = password::hash_password(TEST_PASS).expect("hash");
    let id = user::create(
        pool,
        &NewUser {
            username: username.to_string(),
            password: hash,
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{username}@example.com"),
            is_superuser,
        },
    )
    .await
    .expect("create user");
    user::find_by_id(pool, id).await.expect("query").expect("user exists")
}

/// A regular user whose password is `TEST_PASS`.
pub async fn new_user(pool: &DbPool, username: &str) -> User {
    insert_user(pool, username, false).await
}

/// A superuser whose password is `TEST_PASS`.
pub async fn new_superuser(pool: &DbPool, username: &str) -> User {
    insert_user(pool, username, true).await
}

pub async fn new_school(pool: &DbPool, advisor_id: i64, name: &str) -> School {
    let fields = SchoolFields {
        name: name.to_string(),
        address: "1 School Lane".to_string(),
        city: "Berkeley".to_string(),
        country: "USA".to_string(),
    };
    let id = school::create(pool, advisor_id, &fields).await.expect("create school");
    school::find_by_id(pool, id).await.expect("query").expect("school exists")
}

pub async fn new_assignment(pool: &DbPool, school_id: i64) -> Assignment {
    let new = NewAssignment {
        committee: "DISEC".to_string(),
        country: "Kenya".to_string(),
        school_id,
        rejected: false,
    };
    let id = assignment::create(pool, &new).await.expect("create assignment");
    assignment::find_by_id(pool, id).await.expect("query").expect("assignment exists")
}

pub async fn new_delegate(pool: &DbPool, school_id: i64, assignment_id: Option<i64>) -> Delegate {
    let new = NewDelegate {
        name: "Nathaniel Parke".to_string(),
        email: "nate@earthlink.gov".to_string(),
        summary: "He did awful!".to_string(),
        assignment_id,
        school_id,
    };
    let id = delegate::create(pool, &new).await.expect("create delegate");
    delegate::find_by_id(pool, id).await.expect("query").expect("delegate exists")
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

/// Build the API service against `pool`, with a fresh session key and login limiter.
macro_rules! test_app {
    ($pool:expr) => {
        test_app!($pool, huxley::auth::rate_limit::RateLimiter::default())
    };
    ($pool:expr, $limiter:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(huxley::auth::session::middleware(
                    $pool.clone(),
                    actix_web::cookie::Key::generate(),
                    false,
                    3600,
                ))
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new($limiter))
                .configure(huxley::handlers::api::configure),
        )
        .await
    };
}

/// The session cookie set by `resp`, if any.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

/// A request to `uri`, with an optional JSON body and session cookie.
pub fn api_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&Cookie<'static>>,
) -> TestRequest {
    let mut req = TestRequest::default().method(method).uri(uri);
    if let Some(body) = body {
        req = req.set_json(body);
    }
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    req
}

/// Log in through the API as `$username` (password `TEST_PASS` unless given)
/// and evaluate to the session cookie.
macro_rules! login {
    ($app:expr, $username:expr) => {
        login!($app, $username, common::TEST_PASS)
    };
    ($app:expr, $username:expr, $password:expr) => {{
        let req = common::api_request(
            actix_web::http::Method::POST,
            "/api/users/me",
            Some(serde_json::json!({ "username": $username, "password": $password })),
            None,
        );
        let resp = actix_web::test::call_service(&$app, req.to_request()).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED, "login failed");
        common::session_cookie(&resp).expect("login sets a session cookie")
    }};
}
