//! Shared logging setup for verifier binaries.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "verifier=info,verifier_config=info";
const VERBOSE_LOG_FILTER: &str = "verifier=debug,verifier_config=debug";

/// Logging configuration shared by verifier binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Initialize tracing with stderr output.
///
/// `RUST_LOG` takes precedence over the default filter; `verbose` takes
/// precedence over both. Stdout stays free for command output.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config.verbose, env.as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .with_context(|| format!("Failed to initialize logging for {}", config.app_name))?;

    tracing::debug!(app = config.app_name, "logging initialized");
    Ok(())
}

fn build_filter(verbose: bool, env_directives: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_LOG_FILTER);
    }
    env_directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
