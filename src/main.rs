use std::path::Path;
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use huxley::auth::{password, rate_limit::RateLimiter, session, session_store};
use huxley::config::AppConfig;
use huxley::schemas::ApiErrorResponse;
use huxley::{db, handlers};

/// The directory holding a file-backed SQLite database, if the URL names one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiErrorResponse {
        error: "Not found".to_string(),
        details: None,
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    // Ensure data directory exists
    if let Some(dir) = sqlite_parent_dir(&config.database_url) {
        std::fs::create_dir_all(dir)?;
    }

    let pool = db::init_pool(&config.database_url, config.database_max_connections)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    if let Some((username, pass)) = &config.admin {
        let hash = password::hash_password(pass).map_err(|e| std::io::Error::other(e.to_string()))?;
        db::seed_superuser(&pool, username, &hash)
            .await
            .map_err(std::io::Error::other)?;
    }

    let purged = session_store::purge_expired(&pool)
        .await
        .map_err(std::io::Error::other)?;
    if purged > 0 {
        log::info!("Purged {purged} expired sessions");
    }

    let limiter = RateLimiter::new(
        config.login_max_attempts,
        Duration::from_secs(config.login_window_secs),
    );

    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(session::middleware(
                pool.clone(),
                config.session_key.clone(),
                config.cookie_secure,
                config.session_ttl_secs,
            ))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .configure(handlers::api::configure)
            .default_service(web::to(not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(sqlite_parent_dir("sqlite://data/huxley.db"), Some(Path::new("data")));
        assert_eq!(sqlite_parent_dir("sqlite:data/huxley.db?mode=rwc"), Some(Path::new("data")));
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite://huxley.db"), None);
    }
}
