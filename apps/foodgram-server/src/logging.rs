use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter directives for `-v` counts; zero keeps the configured level.
fn verbosity_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so that stdout stays
/// usable for command output.
///
/// `RUST_LOG` overrides both the config file and `-v`.
pub fn init_logging(cfg: &LoggingConfig, verbose: u8) {
    let directives = verbosity_level(&cfg.level, verbose);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match cfg.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flags_raise_level() {
        assert_eq!(verbosity_level("warn", 0), "warn");
        assert_eq!(verbosity_level("warn", 1), "info");
        assert_eq!(verbosity_level("warn", 2), "debug");
        assert_eq!(verbosity_level("warn", 7), "trace");
    }
}
