//! AI chat powered by Claude API

pub mod chatbot;
pub mod client;
pub mod session;

pub use client::ClaudeClient;
pub use session::AgentSession;
