//! Server-side session storage in the `sessions` table.
//!
//! The cookie only carries a random session key; the state itself lives in
//! the database, so purging a session on logout invalidates every copy of
//! the cookie.

use std::collections::HashMap;

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};

use crate::db::DbPool;

const SESSION_KEY_LEN: usize = 64;

type SessionState = HashMap<String, String>;

#[derive(Clone)]
pub struct DbSessionStore {
    pool: DbPool,
}

impl DbSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, state: &str, ttl: &Duration) -> Result<SessionKey, anyhow::Error> {
        let session_key = generate_session_key()?;
        sqlx::query("INSERT INTO sessions (session_key, state, expires_at) VALUES ($1, $2, $3)")
            .bind(session_key.as_ref())
            .bind(state)
            .bind(expiry(ttl))
            .execute(&self.pool)
            .await?;
        Ok(session_key)
    }
}

fn generate_session_key() -> Result<SessionKey, anyhow::Error> {
    let key: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LEN)
        .map(char::from)
        .collect();
    SessionKey::try_from(key).map_err(|e| anyhow!("invalid session key: {e:?}"))
}

fn expiry(ttl: &Duration) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::seconds(ttl.whole_seconds())
}

impl SessionStore for DbSessionStore {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        let row: Option<(String, DateTime<Utc>)> =
            sqlx::query_as("SELECT state, expires_at FROM sessions WHERE session_key = $1")
                .bind(session_key.as_ref())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| LoadError::Other(e.into()))?;

        let Some((state, expires_at)) = row else {
            return Ok(None);
        };
        if expires_at <= Utc::now() {
            sqlx::query("DELETE FROM sessions WHERE session_key = $1")
                .bind(session_key.as_ref())
                .execute(&self.pool)
                .await
                .map_err(|e| LoadError::Other(e.into()))?;
            return Ok(None);
        }

        serde_json::from_str(&state)
            .map(Some)
            .map_err(|e| LoadError::Deserialization(e.into()))
    }

    async fn save(&self, session_state: SessionState, ttl: &Duration) -> Result<SessionKey, SaveError> {
        let state = serde_json::to_string(&session_state).map_err(|e| SaveError::Serialization(e.into()))?;
        self.insert(&state, ttl).await.map_err(SaveError::Other)
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        let state = serde_json::to_string(&session_state).map_err(|e| UpdateError::Serialization(e.into()))?;

        let result = sqlx::query("UPDATE sessions SET state = $1, expires_at = $2 WHERE session_key = $3")
            .bind(&state)
            .bind(expiry(ttl))
            .bind(session_key.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| UpdateError::Other(e.into()))?;

        if result.rows_affected() > 0 {
            return Ok(session_key);
        }

        // The row expired or was purged underneath us: store under a fresh key.
        self.insert(&state, ttl).await.map_err(UpdateError::Other)
    }

    async fn update_ttl(&self, session_key: &SessionKey, ttl: &Duration) -> Result<(), anyhow::Error> {
        sqlx::query("UPDATE sessions SET expires_at = $1 WHERE session_key = $2")
            .bind(expiry(ttl))
            .bind(session_key.as_ref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        sqlx::query("DELETE FROM sessions WHERE session_key = $1")
            .bind(session_key.as_ref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Remove expired sessions. Returns the number of rows deleted.
pub async fn purge_expired(pool: &DbPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
