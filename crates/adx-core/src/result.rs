//! Tabular query results and their text rendering.
//!
//! Field names mirror the cluster's v1 REST response shape, so a response
//! body deserializes directly into [`TabularResult`]:
//!
//! ```json
//! {"Tables": [{"TableName": "Table_0",
//!              "Columns": [{"ColumnName": "Name", "DataType": "String", "ColumnType": "string"}],
//!              "Rows": [["Events"]]}]}
//! ```
//!
//! Results are ephemeral: rendered to text for the response payload and
//! dropped, never cached or mutated.

use serde::Deserialize;

/// Ordered collection of result tables returned for a single query.
#[derive(Debug, Clone, Deserialize)]
pub struct TabularResult {
    #[serde(rename = "Tables", default)]
    pub tables: Vec<ResultTable>,
}

impl TabularResult {
    /// The first table of the response, which carries the primary result
    /// for v1 queries.
    pub fn primary(&self) -> Option<&ResultTable> {
        self.tables.first()
    }

    /// Text rendering of the primary table.
    pub fn primary_text(&self) -> String {
        self.primary()
            .map(ResultTable::render_text)
            .unwrap_or_else(|| "(no results)".to_string())
    }
}

/// One result table: named columns plus rows of JSON values.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultTable {
    #[serde(rename = "TableName", default)]
    pub name: String,
    #[serde(rename = "Columns", default)]
    pub columns: Vec<ColumnSchema>,
    #[serde(rename = "Rows", default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Column descriptor as reported by the cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSchema {
    #[serde(rename = "ColumnName")]
    pub name: String,
    #[serde(rename = "DataType", default)]
    pub data_type: String,
    #[serde(rename = "ColumnType", default)]
    pub column_type: String,
}

impl ResultTable {
    /// Render the table as width-aligned plain text.
    #[must_use]
    pub fn render_text(&self) -> String {
        if self.rows.is_empty() {
            return "(no rows)".to_string();
        }

        // Column widths: header length vs widest cell.
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.name.len()).collect();
        for row in &self.rows {
            for (i, width) in widths.iter_mut().enumerate() {
                let cell_len = row.get(i).map(value_display_len).unwrap_or(4); // "null"
                *width = (*width).max(cell_len);
            }
        }

        let mut output = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", c.name, width = widths[i]))
            .collect();
        output.push_str(&header.join(" | "));
        output.push('\n');

        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&sep.join("-+-"));
        output.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &width)| {
                    let value = row
                        .get(i)
                        .map(value_to_display)
                        .unwrap_or_else(|| "null".to_string());
                    format!("{value:width$}")
                })
                .collect();
            output.push_str(&cells.join(" | "));
            output.push('\n');
        }

        output
    }
}

fn value_to_display(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn value_display_len(v: &serde_json::Value) -> usize {
    value_to_display(v).len()
}
