//! Reservation server configuration

use crate::BoxError;

/// Reservation server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Connection pool size
    pub db_max_connections: u32,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT HMAC secret
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Lifetime of issued tokens
    pub jwt_expiration_minutes: i64,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Listing page size when the caller gives none
    pub default_page_size: u32,
    /// Upper bound for any requested page size
    pub max_page_size: u32,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let default_page_size = Self::parse_or("DEFAULT_PAGE_SIZE", 10u32).max(1);
        let max_page_size = Self::parse_or("MAX_PAGE_SIZE", 100u32).max(default_page_size);

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            db_max_connections: Self::parse_or("DB_MAX_CONNECTIONS", 10),
            http_port: Self::parse_or("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_issuer: std::env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "reservation-server".into()),
            jwt_audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "reservation-clients".into()),
            jwt_expiration_minutes: Self::parse_or("JWT_EXPIRATION_MINUTES", 1440),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: Self::parse_or("LOG_JSON", false),
            default_page_size,
            max_page_size,
            environment,
        })
    }

    /// Configuration for tests and local tooling (no database)
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: 1,
            http_port: 0,
            environment: "development".into(),
            jwt_secret: "test-secret-for-reservation-server-0123456789".into(),
            jwt_issuer: "reservation-server".into(),
            jwt_audience: "reservation-clients".into(),
            jwt_expiration_minutes: 60,
            log_level: "debug".into(),
            log_json: false,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
