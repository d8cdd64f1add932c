use crate::{errors::PromptError, types::QueryResult};
use serde_json::Value;

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serializes a result table as CSV: a header of column names, then one
/// record per row. NULL becomes an empty field.
pub fn to_csv(result: &QueryResult) -> Result<String, PromptError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !result.columns.is_empty() {
        writer.write_record(&result.columns)?;
    }
    for row in &result.rows {
        writer.write_record(row.iter().map(cell))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PromptError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
