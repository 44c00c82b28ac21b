use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter directive for `-v` counts; `None` keeps the configured level.
fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Pick the filter: `-v` flags, then `RUST_LOG`, then `logging.level`.
fn build_filter(cfg: &LoggingConfig, verbose: u8) -> EnvFilter {
    if let Some(directive) = verbosity_directive(verbose) {
        return EnvFilter::new(directive);
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|e| {
            eprintln!("invalid logging.level '{}': {e}; falling back to info", cfg.level);
            EnvFilter::new("info")
        })
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cfg: &LoggingConfig, verbose: u8) {
    let filter = build_filter(cfg, verbose);
    let registry = tracing_subscriber::registry().with(filter);
    match cfg.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_wins_over_config() {
        let cfg = LoggingConfig {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        };
        assert_eq!(build_filter(&cfg, 2).to_string(), "debug");
        assert_eq!(build_filter(&cfg, 7).to_string(), "trace");
    }

    #[test]
    fn no_flags_means_no_verbosity_directive() {
        assert_eq!(verbosity_directive(0), None);
        assert_eq!(verbosity_directive(1), Some("info"));
    }
}
