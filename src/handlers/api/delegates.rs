use actix_web::{web, HttpResponse};

use crate::auth::identity::Identity;
use crate::auth::policy::{self, Action, Resource};
use crate::auth::validate::{self, Errors};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::delegate::{self, DelegateChanges, NewDelegate, OwnedDelegate};
use crate::models::{assignment, school};
use crate::schemas::{
    DelegateCreateRequest, DelegatePatchRequest, DelegateReplaceRequest, DelegateResponse,
    PageQuery, PaginatedResponse, Update,
};

fn validate_text(name: &str, email: &str, summary: &str) -> Result<(), AppError> {
    let mut errors = Errors::new();
    errors
        .check(validate::validate_required(name, "Name", 64))
        .check(validate::validate_email(email, true))
        .check(validate::validate_optional(summary, "Summary", 2000));
    errors.finish()
}

/// A delegate may only hold an assignment given to its own school.
async fn validate_assignment(
    pool: &DbPool,
    assignment_id: Option<i64>,
    school_id: i64,
) -> Result<(), AppError> {
    let Some(assignment_id) = assignment_id else {
        return Ok(());
    };
    match assignment::find_by_id(pool, assignment_id).await? {
        Some(a) if a.school_id == school_id => Ok(()),
        Some(_) => Err(AppError::invalid(format!(
            "Assignment {assignment_id} does not belong to school {school_id}"
        ))),
        None => Err(AppError::invalid(format!("Assignment {assignment_id} does not exist"))),
    }
}

/// Authentication first (401), then existence (404), then ownership (403).
async fn load_target(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    action: Action,
) -> Result<OwnedDelegate, AppError> {
    identity.require_user()?;
    let target = delegate::find_owned_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    policy::check(identity, Resource::Delegate, action, Some(target.advisor_id))?;
    Ok(target)
}

/// GET /api/delegates - Superusers only.
pub async fn list(
    pool: web::Data<DbPool>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::Delegate, Action::List, None)?;

    let page = delegate::find_paginated(&pool, query.page, query.per_page).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items: page.delegates.into_iter().map(DelegateResponse::from).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total_count,
    }))
}

/// POST /api/delegates - Open to anyone, including anonymous callers.
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<DelegateCreateRequest>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::Delegate, Action::Create, None)?;

    let new = NewDelegate::from(body.into_inner());
    validate_text(&new.name, &new.email, &new.summary)?;
    if school::find_by_id(&pool, new.school_id).await?.is_none() {
        return Err(AppError::invalid(format!("School {} does not exist", new.school_id)));
    }
    validate_assignment(&pool, new.assignment_id, new.school_id).await?;

    let id = delegate::create(&pool, &new).await?;
    log::info!("Created delegate '{}' for school {} (id {id})", new.name, new.school_id);

    let created = delegate::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(DelegateResponse::from(created)))
}

/// GET /api/delegates/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Retrieve).await?;
    Ok(HttpResponse::Ok().json(DelegateResponse::from(target.delegate)))
}

/// PUT /api/delegates/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<DelegateReplaceRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Full(body.into_inner())).await
}

/// PATCH /api/delegates/{id}
pub async fn partial_update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<DelegatePatchRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Partial(body.into_inner())).await
}

async fn apply_update(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    body: Update<DelegateReplaceRequest, DelegatePatchRequest>,
) -> Result<HttpResponse, AppError> {
    let OwnedDelegate { delegate: current, .. } =
        load_target(pool, identity, id, Action::Update).await?;
    let changes: DelegateChanges = body.apply(&current);
    validate_text(&changes.name, &changes.email, &changes.summary)?;
    validate_assignment(pool, changes.assignment_id, current.school_id).await?;

    delegate::update(pool, current.id, &changes).await?;
    let updated = delegate::find_by_id(pool, current.id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(DelegateResponse::from(updated)))
}

/// DELETE /api/delegates/{id}
pub async fn delete(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Destroy).await?;
    delegate::delete(&pool, target.delegate.id).await?;
    log::info!("Deleted delegate {}", target.delegate.id);
    Ok(HttpResponse::NoContent().finish())
}
