use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{error, info, warn};

use super::{Pipeline, PipelineContext, PipelineFuture, RunOutcome};
use crate::config::CotConfig;
use crate::error::{FetchError, PipelineError, RetryExhausted};
use crate::extract::positioning::CONTRACTS;
use crate::extract::{extract_positioning, parse_records, PositioningRecord};
use crate::snapshot::{Snapshot, SnapshotWriter};

pub const SOURCE_NAME: &str = "CFTC Socrata";
const DOMAIN_KEY: &str = "cot";

/// Reduces the weekly positioning report into `cot-data.json`.
///
/// There is no static fallback: a contract is either computed or listed in `errors`.
pub struct CotPipeline {
    context: PipelineContext,
    config: CotConfig,
    writer: SnapshotWriter,
}

impl CotPipeline {
    pub fn new(context: PipelineContext, config: CotConfig, output: impl Into<PathBuf>) -> Self {
        Self {
            context,
            config,
            writer: SnapshotWriter::new(output),
        }
    }

    /// Fetches the newest rows. An empty array is retried like any other implausible payload.
    pub async fn fetch(&self) -> Result<Vec<Value>, RetryExhausted> {
        let client = self.context.source_client();
        let client = &client;
        let url = self.config.request_url();
        let url = url.as_str();
        let config = &self.config;

        info!(target: "fxsnap::cot", url, "querying");
        self.context
            .retry
            .run(SOURCE_NAME, self.context.sleeper.as_ref(), move |_| async move {
                let body = client.get(url, &config.source).await?;
                config.plausibility.check_body(&body)?;
                let rows = parse_records(&body)?;
                config.plausibility.check_records(rows.len())?;
                Ok::<_, FetchError>(rows)
            })
            .await
    }

    pub async fn execute(&self) -> Result<RunOutcome, PipelineError> {
        let path = self.writer.path().display().to_string();

        let rows = match self.fetch().await {
            Ok(rows) => rows,
            Err(exhausted) => {
                let reason = exhausted.to_string();
                error!(target: "fxsnap::cot", "fetch failed: {reason}");
                if self.writer.exists() {
                    warn!(target: "fxsnap::cot", path = %path, "keeping existing snapshot");
                    return Ok(RunOutcome::KeptPrevious { reason });
                }
                error!(target: "fxsnap::cot", path = %path, "no existing snapshot to keep");
                return Ok(RunOutcome::Failed { reason });
            }
        };
        info!(target: "fxsnap::cot", rows = rows.len(), "received rows");

        let records = rows.iter().map(PositioningRecord::from_json).collect::<Vec<_>>();
        let extraction = extract_positioning(&records);

        if extraction.readings.is_empty() {
            let sample_keys = rows
                .first()
                .and_then(Value::as_object)
                .map(|row| row.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            error!(
                target: "fxsnap::cot",
                ?sample_keys,
                "parsed 0 contracts; field names may have changed"
            );
            return Ok(RunOutcome::Failed {
                reason: String::from("parsed 0 contracts"),
            });
        }

        let computed = extraction.readings.len();
        let errors = extraction
            .errors
            .iter()
            .map(|(currency, error)| (*currency, error.to_string()))
            .collect::<BTreeMap<_, _>>();
        let as_of = extraction.as_of.clone();

        let snapshot = Snapshot::new(DOMAIN_KEY, extraction.readings, SOURCE_NAME)
            .with_as_of(extraction.as_of)
            .with_errors(errors);
        self.writer.write(&snapshot)?;

        info!(
            target: "fxsnap::cot",
            path = %path,
            as_of = as_of.as_deref().unwrap_or("unknown"),
            "wrote {computed}/{} contracts",
            CONTRACTS.len()
        );
        Ok(RunOutcome::Written)
    }
}

impl Pipeline for CotPipeline {
    fn name(&self) -> &'static str {
        "cot"
    }

    fn run(&self) -> PipelineFuture<'_> {
        Box::pin(self.execute())
    }
}
