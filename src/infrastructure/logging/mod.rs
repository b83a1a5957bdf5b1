// Logging module - Logging infrastructure
use crate::domain::error::{EchoError, EchoResult};
use std::io;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive `--debug` adds on top of any base filter
pub const DEBUG_DIRECTIVE: &str = "serialecho=debug";

/// Filter used when `RUST_LOG` is not set
pub fn default_filter() -> &'static str {
    "warn"
}

/// `RUST_LOG` (or the default) as the base filter; `--debug` always adds
/// crate-level debug output on top so the flag cannot be silenced by the environment.
pub fn build_filter(debug: bool, rust_log: Option<&str>) -> EchoResult<EnvFilter> {
    let base = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter()));

    if !debug {
        return Ok(base);
    }
    let directive = DEBUG_DIRECTIVE
        .parse::<Directive>()
        .map_err(|e| EchoError::Configuration(format!("Invalid log directive: {}", e)))?;
    Ok(base.add_directive(directive))
}

/// Initialize logging system. Diagnostics go to stderr so stdout carries only
/// device output.
pub fn init_logging(debug: bool) -> EchoResult<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(debug, rust_log.as_deref())?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(debug)
                .with_level(true)
                .with_file(debug)
                .with_line_number(debug),
        )
        .try_init()
        .map_err(|e| EchoError::Configuration(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!("SerialEcho logging system initialized");
    Ok(())
}
