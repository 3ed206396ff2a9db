use actix_session::Session;
use actix_web::{http::StatusCode, web, HttpResponse};

use crate::auth::identity::Identity;
use crate::auth::password;
use crate::auth::policy::{self, Action, Policy, Resource};
use crate::auth::session;
use crate::auth::validate::{self, Errors};
use crate::db::DbPool;
use crate::errors::{unique_violation, AppError};
use crate::models::user::{self, NewUser, User, UserChanges};
use crate::schemas::{
    CreateUserRequest, PageQuery, PaginatedResponse, Update, UserPatchRequest,
    UserReplaceRequest, UserResponse,
};

type UserUpdate = Update<UserReplaceRequest, UserPatchRequest>;

/// Resolve `/users/{id}` for `action`: authentication first, then existence,
/// then ownership.
async fn load_target(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    action: Action,
) -> Result<User, AppError> {
    identity.require_user()?;
    let target = user::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    policy::check(identity, Resource::User, action, Some(target.id))?;
    Ok(target)
}

async fn respond(pool: &DbPool, id: i64, status: StatusCode) -> Result<HttpResponse, AppError> {
    let display = user::find_display_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::build(status).json(UserResponse::from(display)))
}

fn validate_changes(changes: &UserChanges) -> Result<(), AppError> {
    let mut errors = Errors::new();
    errors
        .check(validate::validate_optional(&changes.first_name, "First name", 30))
        .check(validate::validate_optional(&changes.last_name, "Last name", 30))
        .check(validate::validate_email(&changes.email, false));
    errors.finish()
}

/// GET /api/users - Superusers only.
pub async fn list(
    pool: web::Data<DbPool>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::User, Action::List, None)?;

    let user_page = user::find_paginated(&pool, query.page, query.per_page).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items: user_page.users.into_iter().map(UserResponse::from).collect(),
        page: user_page.page,
        per_page: user_page.per_page,
        total: user_page.total_count,
    }))
}

/// POST /api/users - Register a new account. Open to anyone; does not log in.
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::User, Action::Create, None)?;
    let body = body.into_inner();

    let mut errors = Errors::new();
    errors
        .check(validate::validate_username(&body.username))
        .check(validate::validate_password(&body.password))
        .check(validate::validate_email(&body.email, false))
        .check(validate::validate_optional(&body.first_name, "First name", 30))
        .check(validate::validate_optional(&body.last_name, "Last name", 30));
    errors.finish()?;

    let new = NewUser {
        username: body.username.trim().to_string(),
        password: password::hash_password(&body.password)?,
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        email: body.email.trim().to_string(),
        is_superuser: false,
    };
    let id = user::create(&pool, &new)
        .await
        .map_err(|e| unique_violation(e, "Username already exists"))?;
    log::info!("Created user '{}' (id {id})", new.username);

    respond(&pool, id, StatusCode::CREATED).await
}

/// GET /api/users/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Retrieve).await?;
    respond(&pool, target.id, StatusCode::OK).await
}

/// PUT /api/users/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UserReplaceRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Full(body.into_inner()), None).await
}

/// PATCH /api/users/{id}
pub async fn partial_update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UserPatchRequest>,
) -> Result<HttpResponse, AppError> {
    let mut body = body.into_inner();
    let is_active = body.is_active.take();
    apply_update(&pool, &identity, path.into_inner(), Update::Partial(body), is_active).await
}

async fn apply_update(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    body: UserUpdate,
    is_active: Option<bool>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(pool, identity, id, Action::Update).await?;
    if is_active.is_some() {
        policy::authorize(identity, Policy::SuperuserOnly, None)?;
    }
    let changes = body.apply(&target);
    validate_changes(&changes)?;

    user::update(pool, target.id, &changes).await?;
    if let Some(active) = is_active.filter(|a| *a != target.is_active) {
        user::set_active(pool, target.id, active).await?;
        log::info!(
            "User '{}' {}",
            target.username,
            if active { "reactivated" } else { "deactivated" }
        );
    }
    respond(pool, target.id, StatusCode::OK).await
}

/// DELETE /api/users/{id} - Deleting your own account also ends your session.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Destroy).await?;

    user::delete(&pool, target.id).await?;
    log::info!("Deleted user '{}' (id {})", target.username, target.id);

    if identity.user().map(|u| u.id) == Some(target.id) {
        session::log_out(&session);
    }
    Ok(HttpResponse::NoContent().finish())
}
