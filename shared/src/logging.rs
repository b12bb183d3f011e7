use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL` when both are set.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_ascii_lowercase()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}
