//! Application configuration loaded from environment variables.

use domain::Mailbox;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `json` for structured log lines, anything else for text
/// - `DATABASE_URL` — PostgreSQL connection string; unset runs in memory
/// - `LOGIN_URL` — where unauthenticated callers are sent (default: `"/accounts/login/"`)
/// - `CONTACT_FROM` / `CONTACT_TO` — inquiry mailbox; the contact form is
///   disabled unless both are set
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
    pub database_url: Option<String>,
    pub login_url: String,
    pub contact_from: Option<String>,
    pub contact_to: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            log_json: non_empty("LOG_FORMAT").is_some_and(|f| f.trim().eq_ignore_ascii_case("json")),
            database_url: non_empty("DATABASE_URL"),
            login_url: non_empty("LOGIN_URL").unwrap_or(defaults.login_url),
            contact_from: non_empty("CONTACT_FROM"),
            contact_to: non_empty("CONTACT_TO"),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the inquiry mailbox when both ends are configured.
    pub fn mailbox(&self) -> Option<Mailbox> {
        Some(Mailbox {
            from: self.contact_from.clone()?,
            to: self.contact_to.clone()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_json: false,
            database_url: None,
            login_url: "/accounts/login/".to_string(),
            contact_from: None,
            contact_to: None,
        }
    }
}
