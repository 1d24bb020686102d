use crate::bundle::Bundle;
use thiserror::Error;

/// Result of executing one FHIR query
pub type QueryOutcome = Result<Bundle, QueryError>;

/// Ways a FHIR query can fail, from transport to shaping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Error fetching data: {url} - {message}")]
    Network { url: String, message: String },

    #[error("Error fetching data: {url} - {status} - {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Could not shape bundle: {0}")]
    Shaping(String),
}

impl QueryError {
    /// HTTP status of the failed response, if one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            QueryError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Network { .. } => "network",
            QueryError::HttpStatus { .. } => "http_status",
            QueryError::MalformedResponse { .. } => "malformed_response",
            QueryError::Shaping(_) => "shaping",
        }
    }
}
