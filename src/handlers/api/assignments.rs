use actix_web::{web, HttpResponse};

use crate::auth::identity::Identity;
use crate::auth::policy::{self, Action, Resource};
use crate::auth::validate::{self, Errors};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::assignment::{self, Assignment, AssignmentChanges, NewAssignment};
use crate::models::school;
use crate::schemas::{
    AssignmentCreateRequest, AssignmentPatchRequest, AssignmentReplaceRequest,
    AssignmentResponse, PageQuery, PaginatedResponse, Update,
};

fn validate_text(committee: &str, country: &str) -> Result<(), AppError> {
    let mut errors = Errors::new();
    errors
        .check(validate::validate_required(committee, "Committee", 64))
        .check(validate::validate_required(country, "Country", 128));
    errors.finish()
}

/// GET /api/assignments - Superusers only.
pub async fn list(
    pool: web::Data<DbPool>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::Assignment, Action::List, None)?;

    let page = assignment::find_paginated(&pool, query.page, query.per_page).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items: page.assignments.into_iter().map(AssignmentResponse::from).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total_count,
    }))
}

/// POST /api/assignments - Superusers only.
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<AssignmentCreateRequest>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::Assignment, Action::Create, None)?;

    let new = NewAssignment::from(body.into_inner());
    validate_text(&new.committee, &new.country)?;
    if school::find_by_id(&pool, new.school_id).await?.is_none() {
        return Err(AppError::invalid(format!("School {} does not exist", new.school_id)));
    }

    let id = assignment::create(&pool, &new).await?;
    log::info!("Assigned {} / {} to school {} (id {id})", new.committee, new.country, new.school_id);

    let created = assignment::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(AssignmentResponse::from(created)))
}

/// GET /api/assignments/{id} - The school's advisor or a superuser.
pub async fn read(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    identity.require_user()?;
    let owned = assignment::find_owned_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    policy::check(&identity, Resource::Assignment, Action::Retrieve, Some(owned.advisor_id))?;
    Ok(HttpResponse::Ok().json(AssignmentResponse::from(owned.assignment)))
}

async fn load_for(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    action: Action,
) -> Result<Assignment, AppError> {
    identity.require_user()?;
    let target = assignment::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    policy::check(identity, Resource::Assignment, action, None)?;
    Ok(target)
}

/// PUT /api/assignments/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<AssignmentReplaceRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Full(body.into_inner())).await
}

/// PATCH /api/assignments/{id}
pub async fn partial_update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<AssignmentPatchRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Partial(body.into_inner())).await
}

async fn apply_update(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    body: Update<AssignmentReplaceRequest, AssignmentPatchRequest>,
) -> Result<HttpResponse, AppError> {
    let target = load_for(pool, identity, id, Action::Update).await?;
    let changes: AssignmentChanges = body.apply(&target);
    validate_text(&changes.committee, &changes.country)?;

    assignment::update(pool, target.id, &changes).await?;
    let updated = assignment::find_by_id(pool, target.id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(AssignmentResponse::from(updated)))
}

/// DELETE /api/assignments/{id} - Delegates holding it keep their record, minus the assignment.
pub async fn delete(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_for(&pool, &identity, path.into_inner(), Action::Destroy).await?;
    assignment::delete(&pool, target.id).await?;
    log::info!("Deleted assignment {}", target.id);
    Ok(HttpResponse::NoContent().finish())
}
