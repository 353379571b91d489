//! Row classifier for the central-bank rate table.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{Currency, PolicyRate};
use crate::error::ExtractError;
use crate::extract::markup::TableScanner;
use crate::transform::{format_percent, format_upper_bound_range, USD_RANGE_SPREAD};

/// Rate currencies, in the order they are reported.
pub const RATE_CURRENCIES: [Currency; 8] = [
    Currency::USD,
    Currency::AUD,
    Currency::GBP,
    Currency::CAD,
    Currency::EUR,
    Currency::JPY,
    Currency::NZD,
    Currency::CHF,
];

/// Minimum cell count of a row worth classifying.
pub const MIN_ROW_CELLS: usize = 3;

/// Maps the country/region column to a currency.
pub fn currency_for_region(label: &str) -> Option<Currency> {
    match label.trim() {
        "United States" => Some(Currency::USD),
        "Australia" => Some(Currency::AUD),
        "United Kingdom" => Some(Currency::GBP),
        "Canada" => Some(Currency::CAD),
        "Europe" => Some(Currency::EUR),
        "Japan" => Some(Currency::JPY),
        "New Zealand" => Some(Currency::NZD),
        "Switzerland" => Some(Currency::CHF),
        _ => None,
    }
}

/// Result of walking the rate table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateExtraction {
    pub rates: BTreeMap<Currency, PolicyRate>,
    pub skipped: BTreeMap<Currency, ExtractError>,
}

impl RateExtraction {
    pub fn found(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rates.keys().map(|currency| currency.as_str())
    }
}

/// Classifies one row: `None` for irrelevant rows, `Some(Err)` for relevant but unparseable ones.
pub fn classify_row(
    cells: &[String],
) -> Option<Result<(Currency, PolicyRate), (Currency, ExtractError)>> {
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let currency = currency_for_region(&cells[1])?;
    let rate_cell = cells[2].replace('\u{a0}', " ");
    let rate_cell = rate_cell.trim();
    if !rate_cell.contains('%') {
        return None;
    }

    let value = match leading_number(rate_cell) {
        Some(value) => value,
        None => {
            return Some(Err((
                currency,
                ExtractError::Unparseable {
                    field: "rate",
                    value: rate_cell.to_owned(),
                },
            )))
        }
    };

    let rate = if currency == Currency::USD {
        format_upper_bound_range(value, USD_RANGE_SPREAD)
    } else {
        format_percent(value)
    };
    Some(Ok((currency, rate)))
}

/// Walks the document and classifies every row with enough cells.
pub fn extract_rates(html: &str) -> RateExtraction {
    let mut extraction = RateExtraction::default();

    for row in TableScanner::scan(html) {
        match classify_row(&row) {
            Some(Ok((currency, rate))) => {
                debug!(target: "fxsnap::rates", %currency, %rate, "parsed rate row");
                extraction.skipped.remove(&currency);
                extraction.rates.insert(currency, rate);
            }
            Some(Err((currency, error))) => {
                warn!(target: "fxsnap::rates", %currency, "{error}");
                if !extraction.rates.contains_key(&currency) {
                    extraction.skipped.insert(currency, error);
                }
            }
            None => {}
        }
    }

    extraction
}

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(index, ch)| {
            let sign = (*ch == '-' || *ch == '+') && *index == 0;
            !(ch.is_ascii_digit() || *ch == '.' || sign)
        })
        .map_or(trimmed.len(), |(index, _)| index);
    let value = trimmed[..end].parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
