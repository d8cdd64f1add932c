//! Plain-text rendering for terminal output.

use geojson::FeatureCollection;
use geosql::{geo::PlacesView, QueryResult, SchemaEntry};
use serde_json::Value;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn feature_name(markers: &FeatureCollection, index: usize) -> Option<String> {
    markers
        .features
        .get(index)?
        .property("name")?
        .as_str()
        .map(str::to_string)
}

#[derive(Tabled)]
struct PlaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Latitude")]
    latitude: f64,
    #[tabled(rename = "Longitude")]
    longitude: f64,
}

#[derive(Tabled)]
struct SchemaRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Type")]
    column_type: String,
}

pub fn places(view: &PlacesView) -> String {
    match view {
        PlacesView::NotFound { notice } => format!("{notice}\n"),
        PlacesView::Found {
            heading,
            points,
            markers,
        } => {
            let rows: Vec<PlaceRow> = points
                .iter()
                .enumerate()
                .map(|(i, point)| PlaceRow {
                    name: feature_name(markers, i).unwrap_or_else(|| "(unnamed)".to_string()),
                    latitude: point.latitude,
                    longitude: point.longitude,
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            format!("{heading}\n{table}\n")
        }
    }
}

pub fn schema(entries: &[SchemaEntry]) -> String {
    let rows: Vec<SchemaRow> = entries
        .iter()
        .map(|e| SchemaRow {
            table: e.table.clone(),
            column: e.column.clone(),
            column_type: e.column_type.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{table}\n")
}

/// Renders a result table whose columns are only known at runtime.
pub fn table(result: &QueryResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(result.columns.iter().cloned());
    for row in &result.rows {
        builder.push_record(row.iter().map(cell));
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    format!("{table}\n")
}

/// The body printed for an executed question. A single-cell result is
/// shown as a table and then echoed as a scalar.
pub fn answer(result: &QueryResult) -> String {
    if result.is_empty() {
        return "No results found\n".to_string();
    }
    let mut out = table(result);
    if let Some(value) = result.scalar() {
        out.push_str(&format!("Result: {}\n", cell(value)));
    }
    out
}
