//! True Range and Average True Range in pips.

use crate::domain::AtrReading;
use crate::error::ExtractError;

/// Number of most recent True Range values averaged.
pub const ATR_LOOKBACK: usize = 14;

/// Minimum number of daily samples needed to compute one True Range.
pub const MIN_SAMPLES: usize = 2;

/// One daily high/low/close observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySample {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl DailySample {
    pub const fn new(high: f64, low: f64, close: f64) -> Self {
        Self { high, low, close }
    }

    /// Builds a sample only when all three fields are present and finite.
    pub fn from_parts(high: Option<f64>, low: Option<f64>, close: Option<f64>) -> Option<Self> {
        let (high, low, close) = (high?, low?, close?);
        if high.is_finite() && low.is_finite() && close.is_finite() {
            Some(Self::new(high, low, close))
        } else {
            None
        }
    }
}

/// True Range for every sample after the first, oldest first.
pub fn true_ranges(samples: &[DailySample]) -> Vec<f64> {
    samples
        .windows(2)
        .map(|pair| {
            let previous_close = pair[0].close;
            let today = pair[1];
            (today.high - today.low)
                .max((today.high - previous_close).abs())
                .max((today.low - previous_close).abs())
        })
        .collect()
}

/// Mean of the last `min(lookback, count)` True Range values, in price units.
pub fn average_true_range(samples: &[DailySample], lookback: usize) -> Result<f64, ExtractError> {
    if samples.len() < MIN_SAMPLES {
        return Err(ExtractError::InsufficientSamples {
            found: samples.len(),
            required: MIN_SAMPLES,
        });
    }

    let ranges = true_ranges(samples);
    let window = lookback.max(1).min(ranges.len());
    let recent = &ranges[ranges.len() - window..];
    Ok(recent.iter().sum::<f64>() / window as f64)
}

/// Pips per 1.0 of price: 100 for yen pairs, 10 000 otherwise.
pub fn pip_multiplier(pair_label: &str) -> f64 {
    if pair_label.contains("JPY") {
        100.0
    } else {
        10_000.0
    }
}

/// ATR rounded to whole pips, never below one.
pub fn atr_pips(
    samples: &[DailySample],
    pair_label: &str,
    lookback: usize,
) -> Result<AtrReading, ExtractError> {
    let atr = average_true_range(samples, lookback)?;
    let pips = (atr * pip_multiplier(pair_label)).round_ties_even();
    let pips = if pips.is_finite() && pips >= 1.0 {
        pips.min(f64::from(u32::MAX)) as u32
    } else {
        1
    };
    Ok(AtrReading::from_pips(pips))
}
