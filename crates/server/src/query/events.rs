//! Display events emitted alongside tool results
//!
//! The tool never renders anything itself. It hands a `RenderEvent` to a
//! `RenderSink`, and whatever UI is listening decides how to show it.

use hapi_chat_core::{Bundle, FlattenedView, ShapedBundle, TabularView};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// Named display events of the UI contract
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// `views` are the table and flattened forms already built for the model
    RenderResult {
        query: String,
        result_json: Bundle,
        #[serde(flatten)]
        views: ShapedBundle,
    },
    RenderError { query: String, error_message: String },
}

/// Receiver of display events
pub trait RenderSink: Send + Sync {
    fn render(&self, event: RenderEvent);
}

impl RenderSink for UnboundedSender<RenderEvent> {
    fn render(&self, event: RenderEvent) {
        if self.send(event).is_err() {
            tracing::debug!("Render receiver dropped, event discarded");
        }
    }
}

/// Sink for callers that have no UI attached
pub struct DiscardSink;

impl RenderSink for DiscardSink {
    fn render(&self, _event: RenderEvent) {}
}

/// Display-ready form of a `RenderEvent`, as sent to HTTP clients.
///
/// A result carries the three views of a query panel: the table, the
/// flattened paths and the raw bundle.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderPayload {
    Result {
        query: String,
        table: TabularView,
        flattened: FlattenedView,
        bundle: Bundle,
    },
    Error {
        query: String,
        error_message: String,
    },
}

impl From<RenderEvent> for RenderPayload {
    fn from(event: RenderEvent) -> Self {
        match event {
            RenderEvent::RenderResult {
                query,
                result_json,
                views,
            } => RenderPayload::Result {
                query,
                table: views.table,
                flattened: views.flattened,
                bundle: result_json,
            },
            RenderEvent::RenderError {
                query,
                error_message,
            } => RenderPayload::Error {
                query,
                error_message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapi_chat_core::shape;
    use serde_json::json;

    fn result_event() -> RenderEvent {
        let bundle = Bundle::try_from(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [{"resource": {"resourceType": "Patient", "id": "p1"}}]
        }))
        .unwrap();
        RenderEvent::RenderResult {
            query: "Patient".to_string(),
            views: shape(&bundle).unwrap(),
            result_json: bundle,
        }
    }

    #[test]
    fn test_result_event_wire_form() {
        let value = serde_json::to_value(result_event()).unwrap();

        assert_eq!(value["event"], "render_result");
        assert_eq!(value["query"], "Patient");
        assert_eq!(value["result_json"]["entry"][0]["resource"]["id"], "p1");
        assert_eq!(value["table"]["columns"][1], "resource.id");
        assert_eq!(value["flattened"]["entry.0.resource.id"], "p1");
    }

    #[test]
    fn test_payload_reuses_event_views() {
        let RenderEvent::RenderResult { views, .. } = result_event() else {
            unreachable!()
        };

        match RenderPayload::from(result_event()) {
            RenderPayload::Result {
                table, flattened, ..
            } => {
                assert_eq!(table, views.table);
                assert_eq!(flattened, views.flattened);
            }
            other => panic!("Expected a result payload, got {other:?}"),
        }
    }

    #[test]
    fn test_error_event_wire_form() {
        let event = RenderEvent::RenderError {
            query: "Bogus".to_string(),
            error_message: "Error fetching data: x - 400 - y".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "render_error");

        let payload = serde_json::to_value(RenderPayload::from(event)).unwrap();
        assert_eq!(payload["kind"], "error");
        assert_eq!(payload["error_message"], "Error fetching data: x - 400 - y");
    }
}
