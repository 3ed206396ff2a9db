use chrono::Utc;

use crate::db::DbPool;
use super::types::{School, SchoolFields, SchoolPage};

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_advisor(pool: &DbPool, advisor_id: i64) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>("SELECT * FROM schools WHERE advisor_id = $1")
        .bind(advisor_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_paginated(pool: &DbPool, page: i64, per_page: i64) -> Result<SchoolPage, sqlx::Error> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1).saturating_mul(per_page);

    let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schools")
        .fetch_one(pool)
        .await?;
    let schools = sqlx::query_as::<_, School>("SELECT * FROM schools ORDER BY id LIMIT $1 OFFSET $2")
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(SchoolPage { schools, page, per_page, total_count })
}

pub async fn create(pool: &DbPool, advisor_id: i64, fields: &SchoolFields) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO schools (name, address, city, country, advisor_id, registered_at) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&fields.name)
    .bind(&fields.address)
    .bind(&fields.city)
    .bind(&fields.country)
    .bind(advisor_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &DbPool, id: i64, fields: &SchoolFields) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE schools SET name = $1, address = $2, city = $3, country = $4 WHERE id = $5")
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.country)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a school together with its assignments and delegates.
pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schools WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
