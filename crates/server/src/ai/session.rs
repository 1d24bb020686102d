//! Agent session state: the editable system prompt

use std::sync::Arc;

use tokio::sync::RwLock;

/// Greeting the UI shows before the first message
pub const GREETING: &str =
    "Hello! I am HAPI Chat, your AI assistant for FHIR data. How can I assist you today?";

/// Upper bound on an edited system prompt, in characters
pub const MAX_SYSTEM_PROMPT_CHARS: usize = 40_000;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful assistant for FHIR data queries. Users will ask you questions about FHIR resources, and you will respond with relevant information or query results.

You can run any FHIR-supported query with the query_fhir tool, using the full FHIR REST search API. Example queries:

- all resources of type Patient: "Patient"
- patients with the family name "Smith": "Patient?family=Smith"
- date search: "Observation?birthdate=gt2011-01-02"
- date range with identifier: "Observation?subject.identifier=7000135&date=gt2011-01-01&date=lt2011-02-01"
- open-ended date range: "Observation?subject.identifier=7000135&date=gt2011-01-01"
- quantity search: "Observation?value-quantity=lt123.2||mg|http://unitsofmeasure.org"
- chaining: "DiagnosticReport?subject.family=Smith"
- combining: "Patient?family=Smith&given=John"
- and / or: "Patient?address=Montreal,Sherbrooke&address=Quebec,QC"
- sorting: "Patient?identifier=urn:foo|123&_sort=given"
- limiting: "Patient?identifier=urn:foo|123&_count=10"
- paging: "Patient?identifier=urn:foo|123&_count=10&_offset=10""#;

/// Mutable per-deployment agent state, shared across requests
#[derive(Clone)]
pub struct AgentSession {
    system_prompt: Arc<RwLock<String>>,
}

impl AgentSession {
    pub fn new() -> Self {
        Self {
            system_prompt: Arc::new(RwLock::new(DEFAULT_SYSTEM_PROMPT.to_string())),
        }
    }

    pub async fn system_prompt(&self) -> String {
        self.system_prompt.read().await.clone()
    }

    /// Replace the system prompt; empty or oversized prompts are rejected
    pub async fn set_system_prompt(&self, prompt: String) -> Result<(), String> {
        if prompt.trim().is_empty() {
            return Err("System prompt must not be empty".to_string());
        }
        let chars = prompt.chars().count();
        if chars > MAX_SYSTEM_PROMPT_CHARS {
            return Err(format!(
                "System prompt is {chars} characters, limit is {MAX_SYSTEM_PROMPT_CHARS}"
            ));
        }
        *self.system_prompt.write().await = prompt;
        Ok(())
    }
}

impl Default for AgentSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompt_update() {
        let session = AgentSession::new();
        assert_eq!(session.system_prompt().await, DEFAULT_SYSTEM_PROMPT);

        let shared = session.clone();
        session.set_system_prompt("Answer tersely.".into()).await.unwrap();
        assert_eq!(shared.system_prompt().await, "Answer tersely.");
    }

    #[tokio::test]
    async fn test_prompt_limits() {
        let session = AgentSession::new();
        assert!(session.set_system_prompt("   ".into()).await.is_err());
        assert!(
            session
                .set_system_prompt("x".repeat(MAX_SYSTEM_PROMPT_CHARS + 1))
                .await
                .is_err()
        );
        assert!(
            session
                .set_system_prompt("x".repeat(MAX_SYSTEM_PROMPT_CHARS))
                .await
                .is_ok()
        );
        assert_eq!(session.system_prompt().await.len(), MAX_SYSTEM_PROMPT_CHARS);
    }
}
