use common::Result;
use common::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber. `RUST_LOG` wins over `logging.level`.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), &config.level)?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    installed.map_err(|e| common::Error::Other(format!("Failed to install tracing subscriber: {e}")))
}

/// The configured level applies only when `RUST_LOG` is unset; a set but
/// unparsable `RUST_LOG` is an error.
fn build_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    let (source, directives) = match rust_log {
        Some(directives) => (EnvFilter::DEFAULT_ENV, directives),
        None => ("logging.level", level),
    };
    EnvFilter::try_new(directives)
        .map_err(|e| common::Error::Configuration(format!("{source} {directives:?}: {e}")))
}
