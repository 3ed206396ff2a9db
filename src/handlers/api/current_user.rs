//! `/api/users/me`: who am I, log in, log out.

use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::credentials;
use crate::auth::identity::Identity;
use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::{self, get_user_id};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;
use crate::schemas::{LoginRequest, UserResponse};

/// GET /api/users/me - The logged-in user, or 404 for anonymous sessions.
pub async fn read(
    pool: web::Data<DbPool>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    let current = identity.user().ok_or(AppError::NotFound)?;
    let display = user::find_display_by_id(&pool, current.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(display)))
}

/// POST /api/users/me - Log in.
pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    identity: Identity,
    limiter: web::Data<RateLimiter>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    if identity.is_authenticated() {
        return Err(AppError::PermissionDenied(
            "Another user is currently logged in.".to_string(),
        ));
    }

    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if limiter.is_blocked(ip) {
        log::warn!("Login from {ip} refused: too many failed attempts");
        return Err(AppError::TooManyAttempts);
    }

    let found = match credentials::authenticate(&pool, &body.username, &body.password).await {
        Ok(u) => u,
        Err(e @ AppError::AuthenticationFailed(_)) => {
            limiter.record_failure(ip);
            log::warn!("Failed login for '{}' from {ip}: {e}", body.username.trim());
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    limiter.clear(ip);
    session::log_in(&session, &found)?;
    user::touch_last_login(&pool, found.id).await?;
    log::info!("User '{}' logged in", found.username);

    let display = user::find_display_by_id(&pool, found.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(UserResponse::from(display)))
}

/// DELETE /api/users/me - Log out. Always succeeds, logged in or not.
pub async fn logout(session: Session) -> HttpResponse {
    if let Some(user_id) = get_user_id(&session) {
        log::info!("User {user_id} logged out");
    }
    session::log_out(&session);
    HttpResponse::NoContent().finish()
}
