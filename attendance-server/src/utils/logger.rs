//! Logging Infrastructure
//!
//! Console output always; with a log directory, daily-rotated application
//! logs plus a separate security log (events emitted with `target: "security"`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` narrows it
pub const DEFAULT_FILTER: &str = "attendance_server=info,tower_http=info";

/// Build the filter: `RUST_LOG` wins, then `LOG_LEVEL` on top of the defaults
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if level.is_empty() || level == "info" {
            EnvFilter::new(DEFAULT_FILTER)
        } else {
            EnvFilter::new(format!(
                "attendance_server={level},tower_http={level},shared={level}"
            ))
        }
    })
}

/// Create `<dir>/app` and `<dir>/security`
pub fn prepare_log_dirs(log_dir: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
    let app_dir = log_dir.join("app");
    let security_dir = log_dir.join("security");
    fs::create_dir_all(&app_dir)?;
    fs::create_dir_all(&security_dir)?;
    Ok((app_dir, security_dir))
}

/// Install the global subscriber
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> Result<(), BoxError> {
    let console = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let registry = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(console);

    let Some(dir) = log_dir else {
        registry.try_init()?;
        return Ok(());
    };

    let (app_dir, security_dir) = prepare_log_dirs(Path::new(dir))?;

    let app_log = RollingFileAppender::new(Rotation::DAILY, app_dir, "app");
    let app_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::sync::Mutex::new(app_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != "security"
        }));

    let security_log = RollingFileAppender::new(Rotation::DAILY, security_dir, "security");
    let security_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::sync::Mutex::new(security_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "security"
        }));

    registry.with(app_layer).with(security_layer).try_init()?;
    Ok(())
}

/// Security event with a fixed `security` target
///
/// ```ignore
/// security_log!("WARN", "auth_failed", uri = req.uri().to_string());
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
