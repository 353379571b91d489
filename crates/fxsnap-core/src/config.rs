//! Per-source configuration and run settings.
//!
//! Every default here mirrors what production runs use; callers override
//! individual fields rather than building configs from scratch.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::FxPair;
use crate::error::PipelineError;
use crate::extract::positioning::{FIELD_REPORT_DATE, SELECTED_FIELDS};
use crate::http_client::HttpRequest;
use crate::retry::RetryConfig;
use crate::validate::PlausibilityCheck;

pub const RATE_TABLE_URL: &str = "https://www.global-rates.com/en/interest-rates/central-banks/";
pub const CHART_URL_TEMPLATE: &str =
    "https://query1.finance.yahoo.com/v8/finance/chart/{ticker}?interval=1d&range=30d";
pub const POSITIONING_URL: &str = "https://publicreporting.cftc.gov/resource/6dca-aqww.json";

/// Placeholder substituted with the encoded ticker in [`CHART_URL_TEMPLATE`].
pub const TICKER_PLACEHOLDER: &str = "{ticker}";

pub const RATES_FILE: &str = "cb-rates.json";
pub const ATR_FILE: &str = "atr-data.json";
pub const COT_FILE: &str = "cot-data.json";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const CHART_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; FX-Dashboard-ATR/1.0; +https://github.com/actions/fetch-atr)";
const POSITIONING_USER_AGENT: &str = "Mozilla/5.0 (compatible; FXDashboard-GHActions/1.0)";

/// Where and how one upstream is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_ms: u64,
    pub headers: BTreeMap<String, String>,
}

impl SourceConfig {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            timeout_ms,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Central-bank rate table. The host rejects non-browser clients.
    pub fn rate_table() -> Self {
        Self::new(RATE_TABLE_URL, 20_000)
            .with_header("User-Agent", BROWSER_USER_AGENT)
            .with_header("Accept", "text/html,application/xhtml+xml,*/*;q=0.9")
            .with_header("Accept-Language", "en-US,en;q=0.9")
            .with_header("Cache-Control", "no-cache")
    }

    pub fn chart() -> Self {
        Self::new(CHART_URL_TEMPLATE, 12_000).with_header("User-Agent", CHART_USER_AGENT)
    }

    pub fn positioning() -> Self {
        Self::new(POSITIONING_URL, 30_000)
            .with_header("User-Agent", POSITIONING_USER_AGENT)
            .with_header("Accept", "application/json")
    }

    /// Builds a GET for `url` carrying this source's headers and timeout.
    pub fn request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url)
            .with_headers(&self.headers)
            .with_timeout_ms(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesConfig {
    pub source: SourceConfig,
    pub plausibility: PlausibilityCheck,
    pub file_name: String,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::rate_table(),
            plausibility: PlausibilityCheck::new(5_000, &["Central Bank", "central-bank"], 5),
            file_name: RATES_FILE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtrConfig {
    /// `source.url` is a template containing [`TICKER_PLACEHOLDER`].
    pub source: SourceConfig,
    pub lookback: usize,
    /// Pause after each pair, successful or not.
    pub pacing: Duration,
    pub file_name: String,
}

impl Default for AtrConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::chart(),
            lookback: crate::transform::ATR_LOOKBACK,
            pacing: Duration::from_millis(800),
            file_name: ATR_FILE.to_owned(),
        }
    }
}

impl AtrConfig {
    pub fn url_for(&self, pair: FxPair) -> String {
        self.source
            .url
            .replace(TICKER_PLACEHOLDER, &urlencoding::encode(pair.ticker()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CotConfig {
    /// `source.url` is the dataset endpoint without a query string.
    pub source: SourceConfig,
    pub row_limit: u32,
    pub plausibility: PlausibilityCheck,
    pub file_name: String,
}

impl Default for CotConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::positioning(),
            row_limit: 500,
            plausibility: PlausibilityCheck::lenient(),
            file_name: COT_FILE.to_owned(),
        }
    }
}

impl CotConfig {
    /// Newest-first query over the selected columns.
    ///
    /// `$`, `,` and the `%20` escape are part of the query language and must
    /// reach the server unchanged.
    pub fn request_url(&self) -> String {
        format!(
            "{}?$order={FIELD_REPORT_DATE}%20DESC&$limit={}&$select={}",
            self.source.url,
            self.row_limit,
            SELECTED_FIELDS.join(",")
        )
    }
}

/// Everything a run needs besides the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub retry: RetryConfig,
    pub rates: RatesConfig,
    pub atr: AtrConfig,
    pub cot: CotConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public"),
            retry: RetryConfig::default(),
            rates: RatesConfig::default(),
            atr: AtrConfig::default(),
            cot: CotConfig::default(),
        }
    }
}

impl Settings {
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.retry.max_attempts == 0 {
            return Err(PipelineError::Config(String::from(
                "retry attempts must be at least 1",
            )));
        }
        if !self.atr.source.url.contains(TICKER_PLACEHOLDER) {
            return Err(PipelineError::Config(format!(
                "chart url template must contain {TICKER_PLACEHOLDER}"
            )));
        }
        if self.atr.lookback == 0 {
            return Err(PipelineError::Config(String::from("ATR lookback must be positive")));
        }
        if self.cot.row_limit == 0 {
            return Err(PipelineError::Config(String::from("row limit must be positive")));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(PipelineError::Config(String::from("output directory is empty")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positioning_query_is_built_byte_exact() {
        assert_eq!(
            CotConfig::default().request_url(),
            "https://publicreporting.cftc.gov/resource/6dca-aqww.json\
             ?$order=report_date_as_yyyy_mm_dd%20DESC&$limit=500\
             &$select=market_and_exchange_names,report_date_as_yyyy_mm_dd,open_interest_all,\
             noncomm_positions_long_all,noncomm_positions_short_all"
        );
    }

    #[test]
    fn chart_url_encodes_the_ticker() {
        let config = AtrConfig::default();
        assert_eq!(
            config.url_for(FxPair::EurUsd),
            "https://query1.finance.yahoo.com/v8/finance/chart/EURUSD%3DX?interval=1d&range=30d"
        );
    }

    #[test]
    fn requests_carry_source_headers_and_timeout() {
        let request = SourceConfig::positioning().request("https://example.test/x");
        assert_eq!(request.timeout_ms, 30_000);
        assert_eq!(request.headers.get("accept").map(String::as_str), Some("application/json"));
        assert!(request.headers.contains_key("user-agent"));
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        settings.validate().expect("defaults validate");
        assert_eq!(settings.output_path(RATES_FILE), PathBuf::from("public/cb-rates.json"));
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let mut settings = Settings::default();
        settings.retry.max_attempts = 0;
        assert!(matches!(settings.validate(), Err(PipelineError::Config(_))));
    }
}
