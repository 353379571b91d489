use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Formatted policy rate, e.g. `"3.85%"` or `"3.50-3.75%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyRate(String);

impl PolicyRate {
    /// Wraps an already formatted rate string.
    pub fn from_formatted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PolicyRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-level volatility classification of an ATR pip count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolLabel {
    Low,
    Medium,
    High,
}

impl VolLabel {
    /// `< 50` low, `50..=89` medium, `>= 90` high.
    pub const fn from_pips(pips: u32) -> Self {
        if pips < 50 {
            Self::Low
        } else if pips < 90 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for VolLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ATR for one pair, in pips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtrReading {
    pub atr: u32,
    pub vol: VolLabel,
}

impl AtrReading {
    /// The label is always derived from the pip count.
    pub const fn from_pips(atr: u32) -> Self {
        Self {
            atr,
            vol: VolLabel::from_pips(atr),
        }
    }
}

/// Net speculative positioning in percent of open interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CotReading {
    pub net: i64,
    pub prev: i64,
}
