//! FHIR server base endpoint and query URL construction

use std::fmt;

/// Public HAPI test server used when no endpoint is configured
pub const DEFAULT_ENDPOINT: &str = "https://hapi.fhir.org/baseR4";

/// Base URL of a FHIR server, never ending in a slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// Create an endpoint, stripping trailing slashes
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join an endpoint and a query fragment with exactly one slash.
///
/// The fragment is appended verbatim; it is neither escaped nor validated.
pub fn build_url(endpoint: &Endpoint, fragment: &str) -> String {
    format!("{}/{}", endpoint.as_str(), fragment)
}
