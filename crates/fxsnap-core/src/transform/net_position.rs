/// Net positioning `round((long - short) / open_interest * 100)`, ties to even.
///
/// Returns `None` when open interest is missing, zero or non-finite, or when
/// either side is missing, so the result is never infinite or NaN.
pub fn net_position_pct(
    open_interest: Option<f64>,
    long: Option<f64>,
    short: Option<f64>,
) -> Option<i64> {
    let open_interest = open_interest.filter(|value| value.is_finite() && *value != 0.0)?;
    let (long, short) = (long?, short?);

    let pct = ((long - short) / open_interest * 100.0).round_ties_even();
    if pct.is_finite() {
        Some(pct as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_rounded_percentage() {
        assert_eq!(net_position_pct(Some(200_000.0), Some(90_000.0), Some(60_000.0)), Some(15));
        assert_eq!(net_position_pct(Some(300_000.0), Some(40_000.0), Some(100_000.0)), Some(-20));
        assert_eq!(net_position_pct(Some(3.0), Some(2.0), Some(1.0)), Some(33));
    }

    #[test]
    fn exact_half_percent_rounds_to_even() {
        assert_eq!(net_position_pct(Some(200_000.0), Some(85_000.0), Some(60_000.0)), Some(12));
        assert_eq!(net_position_pct(Some(200_000.0), Some(60_000.0), Some(85_000.0)), Some(-12));
        assert_eq!(net_position_pct(Some(200_000.0), Some(87_000.0), Some(60_000.0)), Some(14));
    }

    #[test]
    fn zero_or_missing_open_interest_yields_no_value() {
        assert_eq!(net_position_pct(Some(0.0), Some(10.0), Some(5.0)), None);
        assert_eq!(net_position_pct(None, Some(10.0), Some(5.0)), None);
        assert_eq!(net_position_pct(Some(f64::NAN), Some(10.0), Some(5.0)), None);
    }

    #[test]
    fn missing_side_yields_no_value() {
        assert_eq!(net_position_pct(Some(100.0), None, Some(5.0)), None);
        assert_eq!(net_position_pct(Some(100.0), Some(5.0), None), None);
    }
}
