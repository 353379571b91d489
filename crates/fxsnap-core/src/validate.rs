use crate::error::FetchError;

/// Source-specific plausibility predicate applied before a payload is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlausibilityCheck {
    /// Minimum body length in characters.
    pub min_len: usize,
    /// At least one of these substrings must occur. Empty means no marker check.
    pub markers: Vec<String>,
    /// Minimum number of symbols the extractor has to yield.
    pub min_symbols: usize,
}

impl PlausibilityCheck {
    pub fn new(min_len: usize, markers: &[&str], min_symbols: usize) -> Self {
        Self {
            min_len,
            markers: markers.iter().map(|marker| (*marker).to_owned()).collect(),
            min_symbols,
        }
    }

    /// Accepts any non-empty result set.
    pub fn lenient() -> Self {
        Self::new(0, &[], 1)
    }

    pub fn check_body(&self, body: &str) -> Result<(), FetchError> {
        let len = body.chars().count();
        if len < self.min_len {
            return Err(FetchError::validation(format!(
                "response suspiciously short ({len} chars, expected at least {}); likely blocked",
                self.min_len
            )));
        }

        let marker_found = self
            .markers
            .iter()
            .any(|marker| body.contains(marker.as_str()));
        if !self.markers.is_empty() && !marker_found {
            return Err(FetchError::validation(format!(
                "expected page content not found (looked for {}); url may have changed",
                self.markers.join(" or ")
            )));
        }

        Ok(())
    }

    /// Rejects an extraction that yielded too few symbols.
    pub fn check_count<I, S>(&self, found: I, total: usize) -> Result<(), FetchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = found
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .collect::<Vec<_>>();

        if names.len() < self.min_symbols {
            return Err(FetchError::validation(format!(
                "only {}/{total} symbols parsed, need {}; structure may have changed. found: [{}]",
                names.len(),
                self.min_symbols,
                names.join(", ")
            )));
        }

        Ok(())
    }

    /// Rejects a record set with fewer rows than required, whatever their fields.
    pub fn check_records(&self, count: usize) -> Result<(), FetchError> {
        if count < self.min_symbols {
            return Err(FetchError::validation(format!(
                "empty result set ({count} records, expected at least {})",
                self.min_symbols
            )));
        }
        Ok(())
    }
}
