//! The `query_fhir` agent tool

use hapi_chat_core::{Endpoint, build_url, shape, to_markdown};

use super::client::FhirQueryClient;
use super::events::{RenderEvent, RenderSink};

/// Appended to every successful result so the model summarizes instead of
/// restating rows the user already sees
pub const RESULT_INSTRUCTION: &str = "The user will be shown this data as a table after your response; you may reference and summarize it, but do not repeat the data in your response.";

/// Appended to every failure
pub const ERROR_INSTRUCTION: &str = "The user has been shown the error in the app, but you may also summarize it here if you wish.";

/// Runs FHIR queries on behalf of the agent
#[derive(Clone)]
pub struct QueryTool {
    endpoint: Endpoint,
    client: FhirQueryClient,
}

impl QueryTool {
    pub fn new(endpoint: Endpoint, client: FhirQueryClient) -> Self {
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn client(&self) -> &FhirQueryClient {
        &self.client
    }

    /// Run one query fragment and describe the outcome for the model.
    ///
    /// Every outcome, success or failure, is reported to `sink` and turned
    /// into text; nothing is returned as an error.
    pub async fn run_query<S>(&self, fragment: &str, sink: &S) -> String
    where
        S: RenderSink + ?Sized,
    {
        let url = build_url(&self.endpoint, fragment);

        let outcome = self
            .client
            .execute(&url)
            .await
            .and_then(|bundle| shape(&bundle).map(|shaped| (bundle, shaped)));

        match outcome {
            Ok((bundle, shaped)) => {
                tracing::info!(
                    query = fragment,
                    bundle_type = ?bundle.bundle_type(),
                    entries = bundle.len(),
                    total = ?bundle.total(),
                    has_next = bundle.link("next").is_some(),
                    "Query succeeded"
                );
                tracing::debug!(query = fragment, flattened = %shaped.flattened.to_text(), "Query result");
                metrics::counter!("fhir_queries_total", "outcome" => "success").increment(1);

                let table = to_markdown(&shaped.table);
                sink.render(RenderEvent::RenderResult {
                    query: fragment.to_string(),
                    result_json: bundle,
                    views: shaped,
                });

                format!("Query successful. Here are the results:\n\n{table}\n\n{RESULT_INSTRUCTION}")
            }
            Err(e) => {
                tracing::warn!(
                    query = fragment,
                    kind = e.kind(),
                    status = ?e.status_code(),
                    "Query failed"
                );
                metrics::counter!("fhir_queries_total", "outcome" => e.kind()).increment(1);

                let message = e.to_string();
                sink.render(RenderEvent::RenderError {
                    query: fragment.to_string(),
                    error_message: message.clone(),
                });

                format!("Query failed: {message}. {ERROR_INSTRUCTION}")
            }
        }
    }
}
