//! AI chatbot with the `query_fhir` tool

use super::client::{ClaudeClient, ContentBlock, Message, Tool};
use crate::query::{QueryTool, RenderSink};
use serde_json::{Value as JsonValue, json};

/// Name of the single tool offered to the model
pub const QUERY_TOOL_NAME: &str = "query_fhir";

/// Maximum agentic loop iterations to prevent runaway
const MAX_ITERATIONS: u32 = 10;

/// Define the tools available to the chatbot
pub fn chat_tools() -> Vec<Tool> {
    vec![Tool {
        name: QUERY_TOOL_NAME.to_string(),
        description: "Query the FHIR server with a specific query string. For example, query = \"Patient?family=Smith\"".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "FHIR search path and parameters, appended to the server base URL"
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
    }]
}

/// Execute a tool call requested by the model
async fn execute_tool<S>(tool: &QueryTool, sink: &S, name: &str, input: &JsonValue) -> String
where
    S: RenderSink + ?Sized,
{
    match name {
        QUERY_TOOL_NAME => match input.get("query").and_then(|v| v.as_str()) {
            Some(query) => tool.run_query(query, sink).await,
            None => "Missing required parameter: query".to_string(),
        },
        _ => format!("Unknown tool: {name}"),
    }
}

/// Run the chatbot agentic loop.
///
/// Sends the user message to Claude with the query tool, runs any tool calls
/// (each of which reports to `sink`), and continues until Claude produces a
/// final text response.
pub async fn chat<S>(
    client: &ClaudeClient,
    tool: &QueryTool,
    sink: &S,
    system_prompt: &str,
    user_message: &str,
) -> Result<String, String>
where
    S: RenderSink + ?Sized,
{
    let tools = chat_tools();
    let mut messages = vec![Message::user(user_message)];

    for iteration in 0..MAX_ITERATIONS {
        let response = client.send(Some(system_prompt), &messages, &tools).await?;

        tracing::debug!(
            iteration = iteration,
            stop_reason = &response.stop_reason,
            "Chat loop iteration"
        );

        if response.stop_reason != "tool_use" {
            return response
                .text()
                .ok_or_else(|| "No text content in response".to_string());
        }

        let tool_uses = response.tool_uses();
        messages.push(Message::blocks("assistant", response.content));

        let mut result_blocks = Vec::with_capacity(tool_uses.len());
        for (tool_id, tool_name, tool_input) in &tool_uses {
            tracing::info!(tool = %tool_name, "Executing chat tool");
            let result = execute_tool(tool, sink, tool_name, tool_input).await;
            result_blocks.push(ContentBlock::ToolResult {
                tool_use_id: tool_id.clone(),
                content: result,
            });
        }

        messages.push(Message::blocks("user", result_blocks));
    }

    Err("Chat loop exceeded maximum iterations".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FhirQueryClient, events::DiscardSink};
    use hapi_chat_core::Endpoint;

    #[test]
    fn test_single_query_tool() {
        let tools = chat_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "query_fhir");
        assert_eq!(tools[0].input_schema["required"][0], "query");
    }

    #[tokio::test]
    async fn test_bad_tool_calls_are_reported_as_text() {
        let tool = QueryTool::new(Endpoint::new("http://127.0.0.1:9"), FhirQueryClient::default());

        let result = execute_tool(&tool, &DiscardSink, "delete_everything", &json!({})).await;
        assert_eq!(result, "Unknown tool: delete_everything");

        let result = execute_tool(&tool, &DiscardSink, QUERY_TOOL_NAME, &json!({"q": 1})).await;
        assert_eq!(result, "Missing required parameter: query");
    }
}
