use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Currency pairs tracked by the ATR snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FxPair {
    #[serde(rename = "EUR/USD")]
    EurUsd,
    #[serde(rename = "GBP/USD")]
    GbpUsd,
    #[serde(rename = "USD/JPY")]
    UsdJpy,
    #[serde(rename = "USD/CHF")]
    UsdChf,
    #[serde(rename = "USD/CAD")]
    UsdCad,
    #[serde(rename = "AUD/USD")]
    AudUsd,
    #[serde(rename = "NZD/USD")]
    NzdUsd,
    #[serde(rename = "GBP/JPY")]
    GbpJpy,
}

impl FxPair {
    pub const ALL: [Self; 8] = [
        Self::EurUsd,
        Self::GbpUsd,
        Self::UsdJpy,
        Self::UsdChf,
        Self::UsdCad,
        Self::AudUsd,
        Self::NzdUsd,
        Self::GbpJpy,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::EurUsd => "EUR/USD",
            Self::GbpUsd => "GBP/USD",
            Self::UsdJpy => "USD/JPY",
            Self::UsdChf => "USD/CHF",
            Self::UsdCad => "USD/CAD",
            Self::AudUsd => "AUD/USD",
            Self::NzdUsd => "NZD/USD",
            Self::GbpJpy => "GBP/JPY",
        }
    }

    /// Chart API ticker for the pair.
    pub const fn ticker(self) -> &'static str {
        match self {
            Self::EurUsd => "EURUSD=X",
            Self::GbpUsd => "GBPUSD=X",
            Self::UsdJpy => "JPY=X",
            Self::UsdChf => "CHF=X",
            Self::UsdCad => "CAD=X",
            Self::AudUsd => "AUDUSD=X",
            Self::NzdUsd => "NZDUSD=X",
            Self::GbpJpy => "GBPJPY=X",
        }
    }
}

impl Display for FxPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_label() {
        for pair in FxPair::ALL {
            let json = serde_json::to_string(&pair).expect("serializes");
            assert_eq!(json, format!("\"{}\"", pair.label()));
        }
    }
}
