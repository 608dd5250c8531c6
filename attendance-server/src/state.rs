//! Application state
//!
//! Everything here is built once at startup and is read-only afterwards.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::jwt::{JwtConfig, JwtService};
use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtService>,
    /// Per-client request counter for the API surface
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect, run migrations, and assemble the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::with_pool(config, pool))
    }

    /// Assemble the state around an existing pool
    pub fn with_pool(config: &Config, pool: PgPool) -> Self {
        let jwt = JwtService::with_config(JwtConfig {
            secret: config.jwt_secret.clone(),
            access_ttl_minutes: config.access_token_ttl_minutes,
            refresh_ttl_hours: config.refresh_token_ttl_hours,
            issuer: config.jwt_issuer.clone(),
        });

        Self {
            pool,
            config: Arc::new(config.clone()),
            jwt: Arc::new(jwt),
            rate_limiter: RateLimiter::new(
                config.rate_limit_max_requests,
                config.rate_limit_window_secs,
            ),
        }
    }

    /// Business time zone
    pub fn tz(&self) -> Tz {
        self.config.timezone
    }
}
