//! # Domain Models
//!
//! Fixed key spaces and the per-source observed values.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Currency`] | Currency (or gold) code used by the rate and positioning snapshots |
//! | [`FxPair`] | Currency pair tracked by the ATR snapshot |
//! | [`PolicyRate`] | Formatted policy rate, single value or range |
//! | [`AtrReading`] | ATR in pips plus its [`VolLabel`] |
//! | [`CotReading`] | Net positioning percentage, current and previous period |
//! | [`UtcDateTime`] | UTC timestamp |

mod currency;
mod pair;
mod timestamp;
mod values;

pub use currency::Currency;
pub use pair::FxPair;
pub use timestamp::UtcDateTime;
pub use values::{AtrReading, CotReading, PolicyRate, VolLabel};
