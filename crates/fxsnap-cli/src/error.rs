use fxsnap_core::{PipelineError, SnapshotError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Logging(_) => 2,
            Self::Snapshot(_) => 10,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Snapshot(error) => Self::Snapshot(error),
            PipelineError::Config(message) => Self::Config(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_failures_use_the_io_exit_code() {
        let error = CliError::from(PipelineError::Snapshot(SnapshotError::Io {
            path: "public/cb-rates.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }));
        assert_eq!(error.exit_code(), 10);
    }

    #[test]
    fn configuration_errors_use_the_usage_exit_code() {
        let error = CliError::from(PipelineError::Config(String::from("bad template")));
        assert_eq!(error.exit_code(), 2);
    }
}
