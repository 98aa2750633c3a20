use std::sync::Once;

/// Filter variable checked before `RUST_LOG`.
pub const ENV_LOG: &str = "CADENCE_LOG";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "cadence_engine=debug").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter to apply: explicit config, then `CADENCE_LOG`, then `RUST_LOG`.
    fn resolve_filter(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.env_filter
            .clone()
            .or_else(|| lookup(ENV_LOG))
            .or_else(|| lookup("RUST_LOG"))
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.resolve_filter(|key| std::env::var(key).ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);

        // Other loggers may already be installed (e.g. by a test harness).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig::default().with_filter("warn");
        let filter = config.resolve_filter(|_| Some("trace".to_owned()));
        assert_eq!(filter.as_deref(), Some("warn"));
    }

    #[test]
    fn cadence_log_before_rust_log() {
        let config = LoggingConfig::default();
        let filter = config.resolve_filter(|key| match key {
            ENV_LOG => Some("debug".to_owned()),
            "RUST_LOG" => Some("error".to_owned()),
            _ => None,
        });
        assert_eq!(filter.as_deref(), Some("debug"));

        let filter = config.resolve_filter(|key| (key == "RUST_LOG").then(|| "error".to_owned()));
        assert_eq!(filter.as_deref(), Some("error"));

        assert_eq!(config.resolve_filter(|_| None), None);
    }
}
