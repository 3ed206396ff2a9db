use chrono::Utc;

use crate::db::DbPool;
use super::types::{NewUser, User, UserChanges, UserDisplay, UserPage};

const SELECT_USER_DISPLAY: &str = "\
    SELECT u.id, u.username, u.first_name, u.last_name, u.email, u.is_superuser, \
           s.id AS school_id, u.date_joined, u.last_login \
    FROM users u \
    LEFT JOIN schools s ON s.advisor_id = u.id";

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find user by username for authentication. Returns the row with its password hash.
pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_display_by_id(pool: &DbPool, id: i64) -> Result<Option<UserDisplay>, sqlx::Error> {
    let sql = format!("{SELECT_USER_DISPLAY} WHERE u.id = $1");
    sqlx::query_as::<_, UserDisplay>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_paginated(pool: &DbPool, page: i64, per_page: i64) -> Result<UserPage, sqlx::Error> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1).saturating_mul(per_page);

    let total_count = count(pool).await?;
    let sql = format!("{SELECT_USER_DISPLAY} ORDER BY u.id LIMIT $1 OFFSET $2");
    let users = sqlx::query_as::<_, UserDisplay>(&sql)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(UserPage { users, page, per_page, total_count })
}

pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &DbPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO users (username, password, first_name, last_name, email, is_superuser, date_joined) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.password)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(new.is_superuser)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &DbPool, id: i64, changes: &UserChanges) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET first_name = $1, last_name = $2, email = $3 WHERE id = $4")
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Enable or disable logins for a user. Existing sessions stop resolving to
/// the user on their next request.
pub async fn set_active(pool: &DbPool, id: i64, active: bool) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn touch_last_login(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a user. The advised school, and everything under it, goes with them.
pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
