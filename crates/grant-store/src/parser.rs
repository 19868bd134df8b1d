/// Parser for grant catalog scripts.
///
/// The catalog is authored as a browser script assigning a JSON array:
/// `window.grantsData = [ {...}, ... ];`
/// The assignment prefix and trailing semicolon are optional, so a plain
/// JSON array is accepted as well.
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::model::GrantRecord;
use crate::validate::validate_record;

const ASSIGNMENT_PREFIX: &str = "window.grantsData = ";

static ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:window\.)?grantsData\s*=\s*").expect("valid regex"));
static TRAILING_SEMICOLON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s*$").expect("valid regex"));

/// Parse a catalog script into validated records, preserving authored order.
///
/// Fails on the first record that does not match the schema; nothing is
/// skipped.
pub fn parse_grants_script(content: &str) -> Result<Vec<GrantRecord>, StoreError> {
    let (json, line_offset) = strip_assignment(content);

    let value: Value = serde_json::from_str(json).map_err(|e| StoreError::Parse {
        line: e.line() + line_offset,
        message: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(StoreError::schema(0, None, "catalog must be a JSON array of records"));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let program = item
            .get("program_name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let record: GrantRecord = serde_json::from_value(item)
            .map_err(|e| StoreError::schema(index, program.as_deref(), e.to_string()))?;
        validate_record(index, &record)?;
        records.push(record);
    }

    debug!(records = records.len(), "parsed grant catalog");
    Ok(records)
}

/// Render records in the catalog script format.
pub fn render_grants_script(records: &[GrantRecord]) -> Result<String, StoreError> {
    let json =
        serde_json::to_string_pretty(records).map_err(|e| StoreError::Serialize(e.to_string()))?;
    Ok(format!("{ASSIGNMENT_PREFIX}{json};"))
}

/// Returns the JSON body and the number of lines consumed by the prefix.
fn strip_assignment(content: &str) -> (&str, usize) {
    let (body, line_offset) = match ASSIGNMENT_RE.find(content) {
        Some(m) => (
            &content[m.end()..],
            m.as_str().matches('\n').count(),
        ),
        None => (content, 0),
    };

    let body = match TRAILING_SEMICOLON_RE.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    };

    (body, line_offset)
}
