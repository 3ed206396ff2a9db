use crate::db::DbPool;
use super::types::{Assignment, AssignmentChanges, AssignmentPage, NewAssignment, OwnedAssignment};

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_owned_by_id(pool: &DbPool, id: i64) -> Result<Option<OwnedAssignment>, sqlx::Error> {
    sqlx::query_as::<_, OwnedAssignment>(
        "SELECT a.id, a.committee, a.country, a.school_id, a.rejected, s.advisor_id \
         FROM assignments a \
         JOIN schools s ON s.id = a.school_id \
         WHERE a.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_school(pool: &DbPool, school_id: i64) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE school_id = $1 ORDER BY id")
        .bind(school_id)
        .fetch_all(pool)
        .await
}

pub async fn find_paginated(pool: &DbPool, page: i64, per_page: i64) -> Result<AssignmentPage, sqlx::Error> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1).saturating_mul(per_page);

    let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments")
        .fetch_one(pool)
        .await?;
    let assignments =
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments ORDER BY id LIMIT $1 OFFSET $2")
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool)
            .await?;

    Ok(AssignmentPage { assignments, page, per_page, total_count })
}

pub async fn create(pool: &DbPool, new: &NewAssignment) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO assignments (committee, country, school_id, rejected) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&new.committee)
    .bind(&new.country)
    .bind(new.school_id)
    .bind(new.rejected)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &DbPool, id: i64, changes: &AssignmentChanges) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE assignments SET committee = $1, country = $2, rejected = $3 WHERE id = $4")
        .bind(&changes.committee)
        .bind(&changes.country)
        .bind(changes.rejected)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete an assignment. Delegates holding it keep their school and lose the assignment.
pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
