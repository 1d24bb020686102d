//! HTTP client for FHIR search requests

use std::time::Duration;

use hapi_chat_core::{Bundle, OperationOutcome, QueryError, QueryOutcome};
use reqwest::{StatusCode, header};

const FHIR_JSON: &str = "application/fhir+json";

/// Client that runs a single GET per query and classifies the result
#[derive(Clone)]
pub struct FhirQueryClient {
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl FhirQueryClient {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Fetch `url` and parse the body as a Bundle.
    ///
    /// Only a 200 with a Bundle body succeeds. No retries are made.
    pub async fn execute(&self, url: &str) -> QueryOutcome {
        tracing::info!(url = url, "Executing query");

        let response = match self.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = url, error = %e, "FHIR request failed");
                return Err(QueryError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        tracing::info!(status = status.as_u16(), "Response status");

        let body = response.text().await.map_err(|e| QueryError::Network {
            url: url.to_string(),
            message: format!("Failed to read response body: {}", e),
        })?;

        if status != StatusCode::OK {
            if let Some(outcome) = OperationOutcome::from_body(&body) {
                tracing::warn!(
                    status = status.as_u16(),
                    diagnostics = %outcome.diagnostics(),
                    "FHIR server returned OperationOutcome"
                );
            }
            return Err(QueryError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<Bundle>(&body).map_err(|e| QueryError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Status code of a GET to `url`, used for upstream health checks
    pub async fn probe(&self, url: &str) -> Result<StatusCode, reqwest::Error> {
        Ok(self.get(url).send().await?.status())
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url).header(header::ACCEPT, FHIR_JSON);
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

impl Default for FhirQueryClient {
    fn default() -> Self {
        Self::new(None)
    }
}
