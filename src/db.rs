use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::models::user::{self, NewUser};

pub type DbPool = SqlitePool;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Open a private in-memory database. Every connection to `sqlite::memory:`
/// gets its own database, so the pool is pinned to a single connection that
/// is never recycled.
pub async fn init_memory_pool() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the initial superuser when the users table is empty.
/// Returns the new user's id, or `None` if users already exist.
pub async fn seed_superuser(
    pool: &DbPool,
    username: &str,
    password_hash: &str,
) -> Result<Option<i64>, sqlx::Error> {
    let count = user::count(pool).await?;
    if count > 0 {
        log::info!("Database already has {count} users, skipping superuser seed");
        return Ok(None);
    }

    let new = NewUser {
        username: username.to_string(),
        password: password_hash.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        is_superuser: true,
    };
    let id = user::create(pool, &new).await?;
    log::info!("Seeded superuser '{username}' (id {id})");
    Ok(Some(id))
}
