//! Attendance server configuration
//!
//! Read once at startup from the process environment (`.env` is loaded by
//! `main`). Nothing here mutates after [`Config::from_env`] returns.

use chrono_tz::Tz;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Minimum JWT secret length outside development
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Upper bound of the connection pool
    pub database_max_connections: u32,
    pub http_port: u16,
    /// HS256 signing secret
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_ttl_minutes: i64,
    /// Session lifetime granted at signin
    pub refresh_token_ttl_hours: i64,
    /// Session lifetime granted by each rotation
    pub refresh_rotation_ttl_days: i64,
    /// argon2 memory cost in KiB
    pub password_hash_cost: u32,
    /// Business time zone used for the attendance day
    pub timezone: Tz,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let is_dev = environment == "development";

        let jwt_secret = Self::require_secret(&lookup, "JWT_SECRET", &environment)?;
        if !is_dev && jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters in {environment} environment"
            )
            .into());
        }

        let tz_name = lookup("APP_TIMEZONE").unwrap_or_else(|| "UTC".into());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|_| format!("APP_TIMEZONE is not a valid IANA zone: {tz_name}"))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            http_port: parse_or(&lookup, "HTTP_PORT", 8080),
            jwt_secret,
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "attendance-server".into()),
            access_token_ttl_minutes: parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 15),
            refresh_token_ttl_hours: parse_or(&lookup, "REFRESH_TOKEN_TTL_HOURS", 48),
            refresh_rotation_ttl_days: parse_or(&lookup, "REFRESH_ROTATION_TTL_DAYS", 7),
            password_hash_cost: parse_or(&lookup, "PASSWORD_HASH_COST", 19_456),
            timezone,
            cors_origins,
            rate_limit_max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", 50),
            rate_limit_window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", 30),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: lookup("LOG_JSON").is_some_and(|v| v == "true" || v == "1"),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// Require a secret: must be set and non-empty in non-development environments.
    fn require_secret<F>(lookup: &F, name: &str, environment: &str) -> Result<String, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
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

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
