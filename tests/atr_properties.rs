//! Property tests for the ATR transform.

use fxsnap_core::transform::{atr_pips, average_true_range, true_ranges, DailySample, ATR_LOOKBACK};
use fxsnap_core::VolLabel;
use proptest::prelude::*;

/// Well-formed daily bars: `low <= close <= high`, positive prices.
fn daily_samples() -> impl Strategy<Value = Vec<DailySample>> {
    prop::collection::vec((0.5f64..200.0, 0.0f64..0.05, 0.0f64..=1.0), 2..40).prop_map(|days| {
        days.into_iter()
            .map(|(low, range, close_at)| {
                let high = low + range;
                DailySample::new(high, low, low + range * close_at)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn atr_is_never_below_one_pip(samples in daily_samples(), yen in any::<bool>()) {
        let label = if yen { "USD/JPY" } else { "EUR/USD" };
        let reading = atr_pips(&samples, label, ATR_LOOKBACK).expect("two or more samples");
        prop_assert!(reading.atr >= 1);
        prop_assert_eq!(reading.vol, VolLabel::from_pips(reading.atr));
    }

    #[test]
    fn true_range_is_at_least_the_daily_range(samples in daily_samples()) {
        let ranges = true_ranges(&samples);
        prop_assert_eq!(ranges.len(), samples.len() - 1);
        for (range, day) in ranges.iter().zip(&samples[1..]) {
            prop_assert!(*range >= day.high - day.low);
        }
    }

    #[test]
    fn widening_a_day_never_lowers_atr(
        samples in daily_samples(),
        index in any::<prop::sample::Index>(),
        extra in 0.0f64..0.1,
    ) {
        let mut widened = samples.clone();
        let day = index.index(widened.len());
        widened[day].high += extra;

        let before = average_true_range(&samples, ATR_LOOKBACK).expect("enough samples");
        let after = average_true_range(&widened, ATR_LOOKBACK).expect("enough samples");
        prop_assert!(after >= before);

        let before_pips = atr_pips(&samples, "EUR/USD", ATR_LOOKBACK).expect("enough samples");
        let after_pips = atr_pips(&widened, "EUR/USD", ATR_LOOKBACK).expect("enough samples");
        prop_assert!(after_pips.atr >= before_pips.atr);
    }

    #[test]
    fn only_the_lookback_window_matters(samples in daily_samples(), prefix in daily_samples()) {
        // Prepending older history changes nothing once the window is full.
        prop_assume!(samples.len() > ATR_LOOKBACK);
        let mut longer = prefix;
        longer.extend_from_slice(&samples);

        let recent = average_true_range(&samples, ATR_LOOKBACK).expect("enough samples");
        let with_history = average_true_range(&longer, ATR_LOOKBACK).expect("enough samples");
        prop_assert!((recent - with_history).abs() < 1e-12);
    }
}
