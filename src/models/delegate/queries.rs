use chrono::Utc;

use crate::db::DbPool;
use super::types::{Delegate, DelegateChanges, DelegatePage, NewDelegate, OwnedDelegate};

const SELECT_OWNED_DELEGATE: &str = "\
    SELECT d.id, d.name, d.email, d.summary, d.assignment_id, d.school_id, d.created_at, \
           s.advisor_id \
    FROM delegates d \
    JOIN schools s ON s.id = d.school_id";

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Delegate>, sqlx::Error> {
    sqlx::query_as::<_, Delegate>("SELECT * FROM delegates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a delegate along with the advisor who owns it through its school.
pub async fn find_owned_by_id(pool: &DbPool, id: i64) -> Result<Option<OwnedDelegate>, sqlx::Error> {
    let sql = format!("{SELECT_OWNED_DELEGATE} WHERE d.id = $1");
    sqlx::query_as::<_, OwnedDelegate>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_school(pool: &DbPool, school_id: i64) -> Result<Vec<Delegate>, sqlx::Error> {
    sqlx::query_as::<_, Delegate>("SELECT * FROM delegates WHERE school_id = $1 ORDER BY id")
        .bind(school_id)
        .fetch_all(pool)
        .await
}

pub async fn find_paginated(pool: &DbPool, page: i64, per_page: i64) -> Result<DelegatePage, sqlx::Error> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1).saturating_mul(per_page);

    let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM delegates")
        .fetch_one(pool)
        .await?;
    let delegates =
        sqlx::query_as::<_, Delegate>("SELECT * FROM delegates ORDER BY id LIMIT $1 OFFSET $2")
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool)
            .await?;

    Ok(DelegatePage { delegates, page, per_page, total_count })
}

pub async fn create(pool: &DbPool, new: &NewDelegate) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO delegates (name, email, summary, assignment_id, school_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.summary)
    .bind(new.assignment_id)
    .bind(new.school_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &DbPool, id: i64, changes: &DelegateChanges) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE delegates SET name = $1, email = $2, summary = $3, assignment_id = $4 WHERE id = $5",
    )
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(&changes.summary)
    .bind(changes.assignment_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM delegates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
