use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info, warn};

use super::{Pipeline, PipelineContext, PipelineFuture, RunOutcome};
use crate::config::AtrConfig;
use crate::domain::{AtrReading, FxPair};
use crate::error::{ExtractError, PipelineError, RetryExhausted};
use crate::extract::parse_chart;
use crate::fallback::fallback_atr;
use crate::merge::merge;
use crate::snapshot::{Snapshot, SnapshotWriter, FALLBACK_SOURCE};
use crate::transform::atr_pips;

pub const SOURCE_NAME: &str = "yahoo-finance";
const DOMAIN_KEY: &str = "atr";

/// Why a pair ended up on its fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairFailure {
    #[error(transparent)]
    Fetch(#[from] RetryExhausted),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Measures daily ATR per pair into `atr-data.json`.
pub struct AtrPipeline {
    context: PipelineContext,
    config: AtrConfig,
    writer: SnapshotWriter,
}

impl AtrPipeline {
    pub fn new(context: PipelineContext, config: AtrConfig, output: impl Into<PathBuf>) -> Self {
        Self {
            context,
            config,
            writer: SnapshotWriter::new(output),
        }
    }

    /// Fetches one pair's chart and reduces it to an ATR reading.
    ///
    /// Only the fetch is retried; too few samples is final for this run.
    pub async fn measure(&self, pair: FxPair) -> Result<AtrReading, PairFailure> {
        let client = self.context.source_client();
        let client = &client;
        let url = self.config.url_for(pair);
        let url = url.as_str();
        let source = &self.config.source;

        let samples = self
            .context
            .retry
            .run(pair.label(), self.context.sleeper.as_ref(), move |_| async move {
                let body = client.get(url, source).await?;
                parse_chart(&body)
            })
            .await?;

        Ok(atr_pips(&samples, pair.label(), self.config.lookback)?)
    }

    pub async fn execute(&self) -> Result<RunOutcome, PipelineError> {
        let mut live = BTreeMap::new();
        let mut errors = BTreeMap::new();
        let mut fallback_used = Vec::new();

        for pair in FxPair::ALL {
            match self.measure(pair).await {
                Ok(reading) => {
                    info!(
                        target: "fxsnap::atr",
                        %pair,
                        atr = reading.atr,
                        vol = %reading.vol,
                        "measured"
                    );
                    live.insert(pair, reading);
                }
                Err(failure) => {
                    warn!(target: "fxsnap::atr", %pair, "using fallback: {failure}");
                    errors.insert(pair, failure.to_string());
                    fallback_used.push(pair);
                }
            }
            self.context.sleeper.sleep(self.config.pacing).await;
        }

        let all_fell_back = live.is_empty();
        let source = if all_fell_back { FALLBACK_SOURCE } else { SOURCE_NAME };
        let fell_back = fallback_used.len();

        let snapshot = Snapshot::new(DOMAIN_KEY, merge(fallback_atr(), live), source)
            .with_fallback_used(fallback_used)
            .with_errors(errors);
        self.writer.write(&snapshot)?;

        let path = self.writer.path().display().to_string();
        info!(
            target: "fxsnap::atr",
            path = %path,
            live = FxPair::ALL.len() - fell_back,
            fallback = fell_back,
            "snapshot written"
        );

        if all_fell_back {
            error!(target: "fxsnap::atr", "every pair fell back; snapshot holds no live data");
            return Ok(RunOutcome::WrittenDegraded {
                reason: String::from("every pair fell back to static values"),
            });
        }
        Ok(RunOutcome::Written)
    }
}

impl Pipeline for AtrPipeline {
    fn name(&self) -> &'static str {
        "atr"
    }

    fn run(&self) -> PipelineFuture<'_> {
        Box::pin(self.execute())
    }
}
