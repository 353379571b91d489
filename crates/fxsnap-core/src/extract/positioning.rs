//! Reduces a flat array of positioning records to per-currency net readings.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{CotReading, Currency};
use crate::error::{ExtractError, FetchError};
use crate::transform::net_position_pct;

pub const FIELD_MARKET: &str = "market_and_exchange_names";
pub const FIELD_REPORT_DATE: &str = "report_date_as_yyyy_mm_dd";
pub const FIELD_OPEN_INTEREST: &str = "open_interest_all";
pub const FIELD_LONG: &str = "noncomm_positions_long_all";
pub const FIELD_SHORT: &str = "noncomm_positions_short_all";

/// Columns requested from the source, in `$select` order.
pub const SELECTED_FIELDS: [&str; 5] = [
    FIELD_MARKET,
    FIELD_REPORT_DATE,
    FIELD_OPEN_INTEREST,
    FIELD_LONG,
    FIELD_SHORT,
];

/// Contracts tracked, in reporting order.
pub const CONTRACTS: [(&str, Currency); 9] = [
    ("EURO FX - CHICAGO MERCANTILE EXCHANGE", Currency::EUR),
    ("JAPANESE YEN - CHICAGO MERCANTILE EXCHANGE", Currency::JPY),
    ("BRITISH POUND - CHICAGO MERCANTILE EXCHANGE", Currency::GBP),
    ("SWISS FRANC - CHICAGO MERCANTILE EXCHANGE", Currency::CHF),
    ("CANADIAN DOLLAR - CHICAGO MERCANTILE EXCHANGE", Currency::CAD),
    ("AUSTRALIAN DOLLAR - CHICAGO MERCANTILE EXCHANGE", Currency::AUD),
    ("NZ DOLLAR - CHICAGO MERCANTILE EXCHANGE", Currency::NZD),
    ("USD INDEX - ICE FUTURES U.S.", Currency::USD),
    ("GOLD - COMMODITY EXCHANGE INC.", Currency::XAU),
];

/// Records kept per contract: current and previous period.
pub const PERIODS_KEPT: usize = 2;

/// One flat source record. Numeric columns arrive as strings or numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositioningRecord {
    pub market: String,
    pub report_date: Option<String>,
    pub open_interest: Option<f64>,
    pub long: Option<f64>,
    pub short: Option<f64>,
}

impl PositioningRecord {
    pub fn from_json(value: &Value) -> Self {
        Self {
            market: field_text(value, FIELD_MARKET).unwrap_or_default(),
            report_date: field_text(value, FIELD_REPORT_DATE),
            open_interest: field_number(value, FIELD_OPEN_INTEREST),
            long: field_number(value, FIELD_LONG),
            short: field_number(value, FIELD_SHORT),
        }
    }

    pub fn net_pct(&self) -> Option<i64> {
        net_position_pct(self.open_interest, self.long, self.short)
    }
}

fn field_text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn field_number(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Decodes the response body, which must be a JSON array.
pub fn parse_records(body: &str) -> Result<Vec<Value>, FetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::decode(format!("failed to parse positioning response: {e}")))?;

    match value {
        Value::Array(rows) => Ok(rows),
        other => {
            let preview = other.to_string();
            let preview = preview.get(..300).unwrap_or(&preview);
            Err(FetchError::validation(format!("expected list, got: {preview}")))
        }
    }
}

/// Groups records by market name, keeping the first two per name.
///
/// Records are assumed newest-first.
pub fn group_latest(records: &[PositioningRecord]) -> HashMap<&str, Vec<&PositioningRecord>> {
    let mut groups: HashMap<&str, Vec<&PositioningRecord>> = HashMap::new();
    for record in records {
        let group = groups.entry(record.market.as_str()).or_default();
        if group.len() < PERIODS_KEPT {
            group.push(record);
        }
    }
    groups
}

/// Outcome of reducing a batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositioningExtraction {
    pub readings: BTreeMap<Currency, CotReading>,
    pub errors: BTreeMap<Currency, ExtractError>,
    /// Report date of the first contract that produced a reading.
    pub as_of: Option<String>,
}

/// Computes current and previous net positioning for every configured contract.
pub fn extract_positioning(records: &[PositioningRecord]) -> PositioningExtraction {
    let groups = group_latest(records);
    let mut extraction = PositioningExtraction::default();

    for (contract, currency) in CONTRACTS {
        let Some(group) = groups.get(contract).filter(|group| !group.is_empty()) else {
            warn!(target: "fxsnap::cot", %currency, contract, "contract not found");
            extraction.errors.insert(currency, ExtractError::NotFound);
            continue;
        };

        let current = group[0];
        let Some(net) = current.net_pct() else {
            warn!(target: "fxsnap::cot", %currency, "zero open interest");
            extraction.errors.insert(currency, ExtractError::NoOpenInterest);
            continue;
        };

        let prev = group
            .get(1)
            .and_then(|previous| previous.net_pct())
            .unwrap_or(net);

        info!(target: "fxsnap::cot", %currency, "net={net:+}% prev={prev:+}%");
        extraction.readings.insert(currency, CotReading { net, prev });
        if extraction.as_of.is_none() {
            extraction.as_of = current.report_date.clone();
        }
    }

    extraction
}
