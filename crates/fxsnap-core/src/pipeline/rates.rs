use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{error, info, warn};

use super::{Pipeline, PipelineContext, PipelineFuture, RunOutcome};
use crate::config::RatesConfig;
use crate::domain::{Currency, PolicyRate};
use crate::error::{FetchError, PipelineError, RetryExhausted};
use crate::extract::extract_rates;
use crate::extract::rate_table::RATE_CURRENCIES;
use crate::fallback::fallback_rates;
use crate::merge::merge;
use crate::snapshot::{Snapshot, SnapshotWriter, FALLBACK_SOURCE};

pub const SOURCE_NAME: &str = "global-rates.com";
const DOMAIN_KEY: &str = "rates";

/// Scrapes the central-bank table into `cb-rates.json`.
pub struct RatesPipeline {
    context: PipelineContext,
    config: RatesConfig,
    writer: SnapshotWriter,
}

impl RatesPipeline {
    pub fn new(context: PipelineContext, config: RatesConfig, output: impl Into<PathBuf>) -> Self {
        Self {
            context,
            config,
            writer: SnapshotWriter::new(output),
        }
    }

    /// Fetches and parses the table, retrying blocked or implausible pages.
    pub async fn scrape(&self) -> Result<BTreeMap<Currency, PolicyRate>, RetryExhausted> {
        let client = self.context.source_client();
        let client = &client;
        let config = &self.config;

        self.context
            .retry
            .run(SOURCE_NAME, self.context.sleeper.as_ref(), move |_| async move {
                let body = client.get(&config.source.url, &config.source).await?;
                info!(target: "fxsnap::rates", chars = body.chars().count(), "received page");
                config.plausibility.check_body(&body)?;

                let extraction = extract_rates(&body);
                config
                    .plausibility
                    .check_count(extraction.found(), RATE_CURRENCIES.len())?;
                info!(
                    target: "fxsnap::rates",
                    "parsed {}/{} currencies",
                    extraction.rates.len(),
                    RATE_CURRENCIES.len()
                );
                Ok::<_, FetchError>(extraction.rates)
            })
            .await
    }

    pub async fn execute(&self) -> Result<RunOutcome, PipelineError> {
        let path = self.writer.path().display().to_string();

        match self.scrape().await {
            Ok(live) => {
                for currency in RATE_CURRENCIES {
                    match live.get(&currency) {
                        Some(rate) => {
                            info!(target: "fxsnap::rates", %currency, %rate, "scraped")
                        }
                        None => {
                            warn!(target: "fxsnap::rates", %currency, "not scraped, using fallback")
                        }
                    }
                }

                let snapshot =
                    Snapshot::new(DOMAIN_KEY, merge(fallback_rates(), live), SOURCE_NAME);
                self.writer.write(&snapshot)?;
                info!(target: "fxsnap::rates", path = %path, "snapshot written");
                Ok(RunOutcome::Written)
            }
            Err(exhausted) => {
                let reason = exhausted.to_string();
                error!(target: "fxsnap::rates", "scrape failed: {reason}");

                if self.writer.exists() {
                    warn!(
                        target: "fxsnap::rates",
                        path = %path,
                        "keeping existing snapshot instead of overwriting with fallback"
                    );
                    return Ok(RunOutcome::KeptPrevious { reason });
                }

                warn!(
                    target: "fxsnap::rates",
                    path = %path,
                    "no existing snapshot, writing fallback rates"
                );
                let snapshot = Snapshot::new(DOMAIN_KEY, fallback_rates(), FALLBACK_SOURCE)
                    .with_scrape_error(reason.clone());
                self.writer.write(&snapshot)?;
                Ok(RunOutcome::WrittenDegraded { reason })
            }
        }
    }
}

impl Pipeline for RatesPipeline {
    fn name(&self) -> &'static str {
        "rates"
    }

    fn run(&self) -> PipelineFuture<'_> {
        Box::pin(self.execute())
    }
}
