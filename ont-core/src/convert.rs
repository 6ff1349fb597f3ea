//! Mapping of CSV-export rows onto canonical ONT records.
//!
//! Source field names: `no`, `ID`, `Nama`, `Lokasi`, `IP`, `Latitude`,
//! `Longitude`. Rows without a truthy `ID` and `Nama` are dropped.

use crate::models::{OntRecord, OntStatus, SourceRecord};
use serde_json::{Map, Value};
use tracing::debug;

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Best-effort coordinate: numbers pass through, non-empty strings are
/// parsed, anything else (or a failed parse) becomes 0.
pub fn coerce_coordinate(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) if !s.is_empty() => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Text view of a loosely typed value: `null` is empty, strings pass
/// through, other scalars are stringified.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Non-negative integer from a number or numeric string; 0 otherwise.
/// Floats are truncated.
pub fn coerce_unsigned(value: Option<&Value>) -> u64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(float_to_unsigned)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_unsigned))
        }
        _ => None,
    };
    parsed.unwrap_or(0)
}

fn float_to_unsigned(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f < u64::MAX as f64).then(|| f.trunc() as u64)
}

fn text_field(row: &Map<String, Value>, key: &str) -> String {
    coerce_text(row.get(key))
}

/// Converts one export row, or `None` when the row is not eligible.
pub fn convert_record(row: &SourceRecord) -> Option<OntRecord> {
    let row = row.as_object()?;
    let has_id = row.get("ID").is_some_and(is_truthy);
    let has_name = row.get("Nama").is_some_and(is_truthy);
    if !has_id || !has_name {
        return None;
    }

    Some(OntRecord {
        id: coerce_unsigned(row.get("no")),
        id_pelanggan: text_field(row, "ID"),
        name: text_field(row, "Nama"),
        lokasi: text_field(row, "Lokasi"),
        ip: text_field(row, "IP"),
        latitude: coerce_coordinate(row.get("Latitude")),
        longitude: coerce_coordinate(row.get("Longitude")),
        status: OntStatus::On,
        rto_count: 0,
        extra: Map::new(),
    })
}

/// Converts a whole export, keeping input order.
pub fn convert_records(rows: &[SourceRecord]) -> Vec<OntRecord> {
    let converted: Vec<OntRecord> = rows.iter().filter_map(convert_record).collect();
    debug!(
        input = rows.len(),
        valid = converted.len(),
        skipped = rows.len() - converted.len(),
        "converted export rows"
    );
    converted
}
