//! Markdown rendering of a tabular view

use serde_json::Value as JsonValue;

use crate::table::TabularView;

/// Shown instead of a table when the bundle has no entries
pub const EMPTY_TABLE: &str = "_No entries returned._";

/// Render a pipe table: header, separator, then one line per row.
///
/// Cells are kept on one line; backslashes and pipes are escaped and
/// newlines become `<br>`.
pub fn to_markdown(table: &TabularView) -> String {
    if table.is_empty() || table.columns().is_empty() {
        return EMPTY_TABLE.to_string();
    }

    let mut lines = Vec::with_capacity(table.len() + 2);
    lines.push(table_line(table.columns().iter().map(|c| escape(c))));
    lines.push(table_line(table.columns().iter().map(|_| "---".to_string())));
    for row in table.rows() {
        lines.push(table_line(row.iter().map(cell_text)));
    }
    lines.join("\n")
}

fn table_line(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => escape(s),
        other => escape(&other.to_string()),
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::Bundle;
    use serde_json::json;

    fn table(entries: JsonValue) -> TabularView {
        let bundle = Bundle::try_from(json!({"resourceType": "Bundle", "entry": entries})).unwrap();
        TabularView::from_bundle(&bundle).unwrap()
    }

    #[test]
    fn test_header_separator_and_rows() {
        let md = to_markdown(&table(json!([
            {"resource": {"resourceType": "Patient", "id": "1", "gender": "male"}},
            {"resource": {"resourceType": "Patient", "id": "2"}}
        ])));
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "| resource.resourceType | resource.id | resource.gender | patientId |"
        );
        assert_eq!(lines[1], "| --- | --- | --- | --- |");
        assert_eq!(lines[2], "| Patient | 1 | male | 1 |");
        assert_eq!(lines[3], "| Patient | 2 |  | 2 |");
    }

    #[test]
    fn test_multiline_json_cells_stay_on_one_line() {
        let md = to_markdown(&table(json!([
            {"resource": {"resourceType": "Patient", "name": [{"family": "A|B"}]}}
        ])));

        assert_eq!(md.lines().count(), 3);
        assert!(md.contains("<br>"));
        assert!(md.contains("A\\|B"));
    }

    #[test]
    fn test_backslash_before_pipe_stays_in_its_cell() {
        let md = to_markdown(&table(json!([
            {"resource": {"resourceType": "Basic", "id": "x", "code": "a\\|b"}}
        ])));
        let row = md.lines().nth(2).unwrap();

        assert_eq!(row, "| Basic | x | a\\\\\\|b |");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(to_markdown(&table(json!([]))), EMPTY_TABLE);
    }
}
