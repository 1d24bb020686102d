//! hapi-chat-core: FHIR query result handling
//!
//! IO-free building blocks shared by the chat server: the base endpoint and
//! URL joining, the `Bundle` wrapper, the query error taxonomy, and the
//! shaping of a Bundle into tabular, flattened and markdown views.

pub mod bundle;
pub mod endpoint;
pub mod error;
pub mod flatten;
pub mod markdown;
pub mod outcome;
pub mod shape;
pub mod table;

pub use bundle::{Bundle, BundleType};
pub use endpoint::{DEFAULT_ENDPOINT, Endpoint, build_url};
pub use error::{QueryError, QueryOutcome};
pub use flatten::FlattenedView;
pub use markdown::to_markdown;
pub use outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use shape::{ShapedBundle, shape};
pub use table::TabularView;
