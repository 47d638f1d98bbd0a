//! Logging utilities for Salonbook.
//!
//! Every binary and test harness initializes tracing through this module so
//! that the filter directive, the output format and the optional rolling log
//! file are the same everywhere.

use salonbook_config::models::LoggingConfig;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// ```
/// use salonbook_common::logging;
///
/// logging::init();
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// Calling this twice is harmless; the second call leaves the existing
/// subscriber in place.
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(console_layer())
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// When a directory is configured, a daily-rotated file is written next to
/// the console output. The returned guard flushes that file and must be held
/// for the lifetime of the process.
pub fn init_from_config(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let Some(config) = config else {
        init();
        return None;
    };

    let level = config
        .level
        .as_deref()
        .and_then(|raw| Level::from_str(raw).ok())
        .unwrap_or(Level::INFO);

    let Some(directory) = config.directory.as_deref() else {
        init_with_level(level);
        return None;
    };

    let prefix = config.file_prefix.as_deref().unwrap_or("salonbook.log");
    let appender = tracing_appender::rolling::daily(directory, prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(console_layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!(directory, "Logging initialized at level: {}", level);
    }
    Some(guard)
}

fn console_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
}

fn filter_for(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("salonbook={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
