use actix_web::{web, HttpResponse};

use crate::auth::identity::Identity;
use crate::auth::policy::{self, Action, Resource};
use crate::auth::validate::{self, Errors};
use crate::db::DbPool;
use crate::errors::{unique_violation, AppError};
use crate::models::school::{self, School, SchoolFields};
use crate::models::{assignment, delegate};
use crate::schemas::{
    AssignmentResponse, DelegateResponse, PageQuery, PaginatedResponse, SchoolPatchRequest,
    SchoolRequest, SchoolResponse, Update,
};

const ALREADY_ADVISING: &str = "You already advise a school.";

fn validate_fields(fields: &SchoolFields) -> Result<(), AppError> {
    let mut errors = Errors::new();
    errors
        .check(validate::validate_required(&fields.name, "Name", 128))
        .check(validate::validate_optional(&fields.address, "Address", 128))
        .check(validate::validate_optional(&fields.city, "City", 128))
        .check(validate::validate_optional(&fields.country, "Country", 128));
    errors.finish()
}

async fn load_target(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    action: Action,
) -> Result<School, AppError> {
    identity.require_user()?;
    let target = school::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    policy::check(identity, Resource::School, action, Some(target.advisor_id))?;
    Ok(target)
}

/// GET /api/schools - Superusers only.
pub async fn list(
    pool: web::Data<DbPool>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::School, Action::List, None)?;

    let school_page = school::find_paginated(&pool, query.page, query.per_page).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items: school_page.schools.into_iter().map(SchoolResponse::from).collect(),
        page: school_page.page,
        per_page: school_page.per_page,
        total: school_page.total_count,
    }))
}

/// POST /api/schools - Register a school with the caller as its advisor.
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<SchoolRequest>,
) -> Result<HttpResponse, AppError> {
    policy::check(&identity, Resource::School, Action::Create, None)?;
    let advisor = identity.require_user()?;

    let fields = SchoolFields::from(body.into_inner());
    validate_fields(&fields)?;

    if school::find_by_advisor(&pool, advisor.id).await?.is_some() {
        return Err(AppError::invalid(ALREADY_ADVISING));
    }
    // advisor_id is UNIQUE, so a concurrent registration still lands here
    let id = school::create(&pool, advisor.id, &fields)
        .await
        .map_err(|e| unique_violation(e, ALREADY_ADVISING))?;
    log::info!("User '{}' registered school '{}' (id {id})", advisor.username, fields.name);

    let created = school::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Created().json(SchoolResponse::from(created)))
}

/// GET /api/schools/{id}
pub async fn read(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Retrieve).await?;
    Ok(HttpResponse::Ok().json(SchoolResponse::from(target)))
}

/// PUT /api/schools/{id}
pub async fn update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<SchoolRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Full(body.into_inner())).await
}

/// PATCH /api/schools/{id}
pub async fn partial_update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<SchoolPatchRequest>,
) -> Result<HttpResponse, AppError> {
    apply_update(&pool, &identity, path.into_inner(), Update::Partial(body.into_inner())).await
}

async fn apply_update(
    pool: &DbPool,
    identity: &Identity,
    id: i64,
    body: Update<SchoolRequest, SchoolPatchRequest>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(pool, identity, id, Action::Update).await?;
    let fields = body.apply(&target);
    validate_fields(&fields)?;

    school::update(pool, target.id, &fields).await?;
    let updated = school::find_by_id(pool, target.id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(SchoolResponse::from(updated)))
}

/// DELETE /api/schools/{id} - Also removes the school's assignments and delegates.
pub async fn delete(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Destroy).await?;
    school::delete(&pool, target.id).await?;
    log::info!("Deleted school '{}' (id {})", target.name, target.id);
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/schools/{id}/assignments
pub async fn assignments(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Retrieve).await?;
    let items: Vec<AssignmentResponse> = assignment::find_by_school(&pool, target.id)
        .await?
        .into_iter()
        .map(AssignmentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/schools/{id}/delegates
pub async fn delegates(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target = load_target(&pool, &identity, path.into_inner(), Action::Retrieve).await?;
    let items: Vec<DelegateResponse> = delegate::find_by_school(&pool, target.id)
        .await?
        .into_iter()
        .map(DelegateResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}
