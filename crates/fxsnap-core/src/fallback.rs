//! Hand-maintained last-known-good values, used only where live extraction failed.

use std::collections::BTreeMap;

use crate::domain::{AtrReading, Currency, FxPair, PolicyRate};

/// Policy rates as of the last manual review.
pub const FALLBACK_RATES: [(Currency, &str); 8] = [
    (Currency::USD, "3.50-3.75%"),
    (Currency::AUD, "3.85%"),
    (Currency::EUR, "2.15%"),
    (Currency::GBP, "3.75%"),
    (Currency::JPY, "0.75%"),
    (Currency::CHF, "0.00%"),
    (Currency::CAD, "2.25%"),
    (Currency::NZD, "2.25%"),
];

/// ATR pip counts as of the last manual measurement.
pub const FALLBACK_ATR_PIPS: [(FxPair, u32); 8] = [
    (FxPair::EurUsd, 68),
    (FxPair::GbpUsd, 85),
    (FxPair::UsdJpy, 112),
    (FxPair::UsdChf, 58),
    (FxPair::UsdCad, 78),
    (FxPair::AudUsd, 52),
    (FxPair::NzdUsd, 48),
    (FxPair::GbpJpy, 145),
];

pub fn fallback_rates() -> BTreeMap<Currency, PolicyRate> {
    FALLBACK_RATES
        .into_iter()
        .map(|(currency, rate)| (currency, PolicyRate::from_formatted(rate)))
        .collect()
}

pub fn fallback_atr() -> BTreeMap<FxPair, AtrReading> {
    FALLBACK_ATR_PIPS
        .into_iter()
        .map(|(pair, pips)| (pair, AtrReading::from_pips(pips)))
        .collect()
}
