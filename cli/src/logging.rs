// Logging for the terminal client, powered by tracing-subscriber.
//
// The link crate logs through the `log` facade; a `tracing_log::LogTracer`
// bridge routes those records into the same subscriber. Output goes to
// stderr so stdout stays clean for command results (and `--json`).

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{CLIError, Result};

/// Build the `EnvFilter` from the base level plus noisy-crate overrides.
///
/// `RUST_LOG`, when set, replaces the whole filter.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];

    // Suppress noisy third-party crates
    let noisy: &[(&str, &str)] = &[
        ("hyper", "warn"),
        ("hyper_util", "warn"),
        ("reqwest", "warn"),
        ("rustls", "warn"),
        ("h2", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str).map_err(|e| {
        CLIError::ConfigurationError(format!("Invalid log filter '{}': {}", filter_str, e))
    })
}

/// Initialize logging.
///
/// `verbose` forces `debug`; otherwise `level` (from `[logging] level`) is used.
pub fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { level };

    // Bridge `log` crate → tracing
    tracing_log::LogTracer::init().ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_span_events(FmtSpan::CLOSE)
        .finish()
        .try_init()
        .map_err(|e| CLIError::ConfigurationError(format!("Failed to initialize logging: {}", e)))?;

    tracing::trace!("Logging initialized: level={}", level);
    Ok(())
}
