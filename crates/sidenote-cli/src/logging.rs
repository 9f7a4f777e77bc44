use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

const CRATES: [&str; 3] = ["sidenote_cli", "sidenote_core", "sidenote_config"];

/// Pick the level: `--log-level`, then `--verbose`, then the config file, then warn
pub fn resolve_level(flag: Option<LogLevel>, verbose: bool, configured: Option<&str>) -> LevelFilter {
    if let Some(level) = flag {
        return level.into();
    }
    if verbose {
        return LevelFilter::DEBUG;
    }
    configured
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::WARN)
}

/// Install the stderr subscriber; `RUST_LOG` wins when set
pub fn init(flag: Option<LogLevel>, verbose: bool, configured: Option<&str>) {
    let level = resolve_level(flag, verbose, configured);
    let filter = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.is_empty() => EnvFilter::new(spec),
        _ => EnvFilter::new(
            CRATES
                .iter()
                .map(|krate| format!("{krate}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        ),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
