//! # Pipelines
//!
//! One pipeline per upstream, all following the same skeleton:
//! fetch with retry, validate, extract, transform, merge with fallbacks and
//! write one snapshot atomically. What differs is the failure policy once
//! the retry budget is spent.
//!
//! | Pipeline | Exhausted, prior artifact | Exhausted, no prior artifact |
//! |----------|---------------------------|------------------------------|
//! | [`RatesPipeline`] | kept, exit 0 | fallback written, exit 1 |
//! | [`AtrPipeline`] | per pair: fallback value | per pair: fallback value |
//! | [`CotPipeline`] | kept, exit 0 | nothing written, exit 1 |

mod atr;
mod cot;
mod rates;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::retry::{RetryConfig, Sleeper, TokioSleeper};
use crate::source::SourceClient;

pub use atr::{AtrPipeline, PairFailure};
pub use cot::CotPipeline;
pub use rates::RatesPipeline;

/// Shared collaborators injected into every pipeline.
#[derive(Clone)]
pub struct PipelineContext {
    pub http: Arc<dyn HttpClient>,
    pub sleeper: Arc<dyn Sleeper>,
    pub retry: RetryConfig,
}

impl PipelineContext {
    pub fn new(http: Arc<dyn HttpClient>, sleeper: Arc<dyn Sleeper>, retry: RetryConfig) -> Self {
        Self {
            http,
            sleeper,
            retry,
        }
    }

    /// reqwest transport and tokio timer.
    pub fn production(retry: RetryConfig) -> Self {
        Self::new(
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(TokioSleeper),
            retry,
        )
    }

    pub fn source_client(&self) -> SourceClient {
        SourceClient::new(Arc::clone(&self.http))
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A snapshot with live data was written.
    Written,
    /// A snapshot was written, but built entirely from fallback values.
    WrittenDegraded { reason: String },
    /// The upstream failed and the previous artifact was left untouched.
    KeptPrevious { reason: String },
    /// Nothing usable was produced and nothing was written.
    Failed { reason: String },
}

impl RunOutcome {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Written | Self::KeptPrevious { .. } => 0,
            Self::WrittenDegraded { .. } | Self::Failed { .. } => 1,
        }
    }

    pub const fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

impl Display for RunOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Written => f.write_str("written"),
            Self::WrittenDegraded { reason } => write!(f, "written from fallback ({reason})"),
            Self::KeptPrevious { reason } => write!(f, "kept previous snapshot ({reason})"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

pub type PipelineFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RunOutcome, PipelineError>> + Send + 'a>>;

/// A runnable snapshot job.
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self) -> PipelineFuture<'_>;
}
