use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

use crate::http_client::HttpError;

/// Number of response-body bytes kept on a protocol failure.
pub const BODY_SNIPPET_BYTES: usize = 500;

/// Classification of a failed fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection, DNS or timeout failure.
    Transport,
    /// Upstream answered with a non-2xx status.
    Protocol,
    /// The payload arrived but is implausible (blocked page, schema change, empty result).
    Validation,
    /// The payload could not be decoded at all.
    Decode,
}

/// Structured failure of one fetch attempt, consumed by the retry controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    status: Option<u16>,
    retryable: bool,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: message.into(),
            status: None,
            retryable: true,
        }
    }

    /// Builds a protocol failure keeping status, reason and the head of the body verbatim.
    pub fn protocol(status: u16, reason: Option<&str>, body: &str) -> Self {
        let reason = reason.unwrap_or("Unknown Status");
        let snippet = body_snippet(body);
        let message = if snippet.is_empty() {
            format!("HTTP {status}: {reason}")
        } else {
            format!("HTTP {status}: {reason}; body: {snippet}")
        };

        Self {
            kind: FetchErrorKind::Protocol,
            message,
            status: Some(status),
            retryable: true,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Validation,
            message: message.into(),
            status: None,
            retryable: true,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            message: message.into(),
            status: None,
            retryable: true,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::Protocol => "fetch.protocol",
            FetchErrorKind::Validation => "fetch.validation",
            FetchErrorKind::Decode => "fetch.decode",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

impl From<HttpError> for FetchError {
    fn from(error: HttpError) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: error.message().to_owned(),
            status: None,
            retryable: error.retryable(),
        }
    }
}

fn body_snippet(body: &str) -> &str {
    if body.len() <= BODY_SNIPPET_BYTES {
        return body.trim();
    }
    let mut end = BODY_SNIPPET_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].trim()
}

/// Aggregate failure raised once every attempt has been spent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all {attempts} attempts failed; last error: {last}")]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last: FetchError,
}

/// Per-symbol extraction failure. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("not found in results")]
    NotFound,
    #[error("zero open interest")]
    NoOpenInterest,
    #[error("could not parse {field}: {value:?}")]
    Unparseable { field: &'static str, value: String },
    #[error("only {found} valid samples, at least {required} required")]
    InsufficientSamples { found: usize, required: usize },
}

/// Failure while persisting a snapshot artifact.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Run-level error surfaced to the driver.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
