use serde::Serialize;

use crate::bundle::Bundle;
use crate::error::QueryError;
use crate::flatten::FlattenedView;
use crate::table::TabularView;

/// Both display views of one bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedBundle {
    pub table: TabularView,
    pub flattened: FlattenedView,
}

/// Derive the tabular and flattened views from the same bundle
pub fn shape(bundle: &Bundle) -> Result<ShapedBundle, QueryError> {
    Ok(ShapedBundle {
        table: TabularView::from_bundle(bundle)?,
        flattened: FlattenedView::from_bundle(bundle),
    })
}
