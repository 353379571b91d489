use crate::domain::PolicyRate;

/// Width of the target range reported as a single upper bound.
pub const USD_RANGE_SPREAD: f64 = 0.25;

/// `"{value}%"` with two decimals.
pub fn format_percent(value: f64) -> PolicyRate {
    PolicyRate::from_formatted(format!("{:.2}%", round2(value)))
}

/// `"{upper - spread}-{upper}%"` with two decimals and an ASCII hyphen.
pub fn format_upper_bound_range(upper: f64, spread: f64) -> PolicyRate {
    let lower = round2(upper - spread);
    PolicyRate::from_formatted(format!("{:.2}-{:.2}%", lower, round2(upper)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
