use actix_web::cookie::Key;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/huxley.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const MIN_SESSION_KEY_LEN: usize = 64;

/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub session_ttl_secs: i64,
    pub login_max_attempts: usize,
    pub login_window_secs: u64,
    pub admin: Option<(String, String)>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let session_key = match lookup("SESSION_KEY") {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {MIN_SESSION_KEY_LEN}+), generating random key",
                    val.len()
                );
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        };

        let admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => {
                Some((user.trim().to_string(), pass))
            }
            _ => None,
        };

        AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 8),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            session_key,
            cookie_secure: parse_bool(lookup("COOKIE_SECURE").as_deref()),
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", 14 * 24 * 60 * 60),
            login_max_attempts: parse_or(&lookup, "LOGIN_MAX_ATTEMPTS", 5),
            login_window_secs: parse_or(&lookup, "LOGIN_WINDOW_SECS", 900),
            admin,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable {name}={raw:?}");
            default
        }),
        None => default,
    }
}

fn parse_bool(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.database_max_connections, 8);
        assert!(!cfg.cookie_secure);
        assert_eq!(cfg.login_max_attempts, 5);
        assert_eq!(cfg.login_window_secs, 900);
        assert!(cfg.admin.is_none());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let cfg = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("COOKIE_SECURE", "true"),
            ("LOGIN_MAX_ATTEMPTS", "3"),
            ("SESSION_TTL_SECS", "60"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "hunter22"),
        ]);
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert!(cfg.cookie_secure);
        assert_eq!(cfg.login_max_attempts, 3);
        assert_eq!(cfg.session_ttl_secs, 60);
        assert_eq!(cfg.admin, Some(("root".to_string(), "hunter22".to_string())));
    }

    #[test]
    fn test_bad_numbers_fall_back_to_defaults() {
        let cfg = config_from(&[("LOGIN_WINDOW_SECS", "soon")]);
        assert_eq!(cfg.login_window_secs, 900);
    }

    #[test]
    fn test_admin_requires_both_username_and_password() {
        let cfg = config_from(&[("ADMIN_USERNAME", "root")]);
        assert!(cfg.admin.is_none());
    }

    #[test]
    fn test_long_session_key_is_used() {
        let raw = "k".repeat(64);
        let a = config_from(&[("SESSION_KEY", raw.as_str())]);
        let b = config_from(&[("SESSION_KEY", raw.as_str())]);
        assert_eq!(a.session_key.master(), b.session_key.master());
    }
}
