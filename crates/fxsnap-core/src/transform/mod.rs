//! Numeric derivations applied after extraction.

pub mod atr;
pub mod net_position;
pub mod rate_format;

pub use atr::{atr_pips, average_true_range, pip_multiplier, true_ranges, DailySample, ATR_LOOKBACK};
pub use net_position::net_position_pct;
pub use rate_format::{format_percent, format_upper_bound_range, USD_RANGE_SPREAD};
