//! Extractors turning raw payloads into per-symbol values.
//!
//! | Module | Payload | Output |
//! |--------|---------|--------|
//! | [`markup`] | HTML document | table rows |
//! | [`rate_table`] | table rows | policy rate per currency |
//! | [`chart`] | chart API JSON | daily high/low/close samples |
//! | [`positioning`] | JSON array of records | net positioning per currency |

pub mod chart;
pub mod markup;
pub mod positioning;
pub mod rate_table;

pub use chart::parse_chart;
pub use markup::TableScanner;
pub use positioning::{extract_positioning, parse_records, PositioningExtraction, PositioningRecord};
pub use rate_table::{extract_rates, RateExtraction};
