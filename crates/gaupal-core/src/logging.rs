//! Logging setup for the model services.
//!
//! Built on `tracing` with an `EnvFilter`, so `RUST_LOG` always wins over
//! the level configured here.

use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Whether to include the target (module path)
    pub show_target: bool,
    /// Whether to include timestamps
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: false,
            show_timestamps: true,
        }
    }
}

impl LogConfig {
    /// Verbose config for debugging
    pub fn verbose() -> Self {
        Self {
            level: "debug".to_string(),
            show_target: true,
            show_timestamps: true,
        }
    }

    /// Quiet config (errors only)
    pub fn quiet() -> Self {
        Self {
            level: "error".to_string(),
            show_target: false,
            show_timestamps: false,
        }
    }
}

/// Initialize logging with the given configuration
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .compact();

    let result = if config.show_timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };

    result.map_err(|e| format!("Failed to initialize logging: {}", e))
}
