use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Installs the stderr subscriber. An explicit directive beats `RUST_LOG`, which beats `info`.
pub fn init(directive: Option<&str>) -> Result<(), CliError> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| CliError::Logging(format!("invalid log level '{directive}': {e}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
