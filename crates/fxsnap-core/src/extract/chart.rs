//! Daily high/low/close series from the chart API.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::transform::DailySample;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Decodes a chart payload into samples ordered oldest to newest.
///
/// A malformed body is a decode failure; a chart-level error or an empty result
/// set is a validation failure. Both are retried. Samples with any field missing
/// are dropped here; whether enough remain is decided by the transform.
pub fn parse_chart(body: &str) -> Result<Vec<DailySample>, FetchError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::decode(format!("failed to parse chart response: {e}")))?;

    if let Some(error) = response.chart.error.filter(|error| !error.is_null()) {
        return Err(FetchError::validation(format!("chart API error: {error}")));
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| FetchError::validation("no result in chart response"))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    Ok(quote
        .high
        .iter()
        .zip(&quote.low)
        .zip(&quote.close)
        .filter_map(|((high, low), close)| DailySample::from_parts(*high, *low, *close))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;

    #[test]
    fn aligns_arrays_by_index_and_drops_gaps() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"EURUSD=X"},"timestamp":[1,2,3],
            "indicators":{"quote":[{"high":[1.10,null,1.12],"low":[1.09,1.10,1.11],
            "close":[1.095,1.105,1.115]}]}}],"error":null}}"#;

        let samples = parse_chart(body).expect("valid chart");
        assert_eq!(
            samples,
            vec![DailySample::new(1.10, 1.09, 1.095), DailySample::new(1.12, 1.11, 1.115)]
        );
    }

    #[test]
    fn empty_result_is_a_validation_failure() {
        let error = parse_chart(r#"{"chart":{"result":[],"error":null}}"#).expect_err("no result");
        assert_eq!(error.kind(), FetchErrorKind::Validation);

        let error = parse_chart(r#"{"chart":{"result":null}}"#).expect_err("null result");
        assert_eq!(error.kind(), FetchErrorKind::Validation);
    }

    #[test]
    fn chart_level_error_is_a_validation_failure() {
        let body = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found"}}}"#;
        let error = parse_chart(body).expect_err("api error");
        assert_eq!(error.kind(), FetchErrorKind::Validation);
        assert!(error.message().contains("No data found"));
    }

    #[test]
    fn garbage_is_a_decode_failure() {
        let error = parse_chart("<html>blocked</html>").expect_err("not json");
        assert_eq!(error.kind(), FetchErrorKind::Decode);
    }

    #[test]
    fn missing_quote_block_yields_no_samples() {
        let samples = parse_chart(r#"{"chart":{"result":[{"indicators":{"quote":[]}}]}}"#)
            .expect("structurally valid");
        assert!(samples.is_empty());
    }
}
