//! FHIR query pipeline: fetch, shape, and report to the agent and the UI

pub mod client;
pub mod events;
pub mod tool;

pub use client::FhirQueryClient;
pub use events::{RenderEvent, RenderPayload, RenderSink};
pub use tool::{QueryTool, RESULT_INSTRUCTION};
