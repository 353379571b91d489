use std::sync::Arc;

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::http_client::HttpClient;

/// Performs one GET against a configured source and classifies the outcome.
#[derive(Clone)]
pub struct SourceClient {
    http: Arc<dyn HttpClient>,
}

impl SourceClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Returns the body of a 2xx response. Anything else is a [`FetchError`].
    pub async fn get(&self, url: &str, source: &SourceConfig) -> Result<String, FetchError> {
        let response = self.http.execute(source.request(url)).await?;
        if !response.is_success() {
            return Err(FetchError::protocol(
                response.status,
                response.reason(),
                &response.body,
            ));
        }
        Ok(response.body)
    }
}
