//! Core of fxsnap.
//!
//! This crate contains:
//! - Fixed key spaces (currencies, pairs) and the observed values per source
//! - Transport abstraction, retry controller and plausibility checks
//! - Extractors for the rate table, chart series and positioning records
//! - Fallback tables, merge and atomic snapshot persistence
//! - One pipeline per upstream, each returning a [`RunOutcome`]

pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod http_client;
pub mod merge;
pub mod pipeline;
pub mod retry;
pub mod snapshot;
pub mod source;
pub mod transform;
pub mod validate;

pub use config::{AtrConfig, CotConfig, RatesConfig, Settings, SourceConfig};
pub use domain::{AtrReading, CotReading, Currency, FxPair, PolicyRate, UtcDateTime, VolLabel};
pub use error::{
    ExtractError, FetchError, FetchErrorKind, PipelineError, RetryExhausted, SnapshotError,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use merge::merge;
pub use pipeline::{
    AtrPipeline, CotPipeline, PairFailure, Pipeline, PipelineContext, RatesPipeline, RunOutcome,
};
pub use retry::{RetryConfig, Sleeper, TokioSleeper};
pub use snapshot::{Snapshot, SnapshotWriter, FALLBACK_SOURCE};
pub use source::SourceClient;
pub use validate::PlausibilityCheck;
