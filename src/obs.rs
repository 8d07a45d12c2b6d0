//! Logging setup.

pub const LOG_ENV_VAR: &str = "SIGNALBENCH_LOG";

/// Install the global `tracing` subscriber writing to stderr.
///
/// `SIGNALBENCH_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str) -> Result<(), String> {
    let filter = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
