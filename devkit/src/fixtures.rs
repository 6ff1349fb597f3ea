/*!
JSON fixtures for export rows (`csvjson.json`) and canonical records
(`onts.json`). Everything is built as `serde_json::Value` so tests can also
describe loosely typed or broken input.
*/

use serde_json::{Map, Value};

/// Fluent builder over a JSON object.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Export row as produced by the CSV-to-JSON conversion, coordinates as
/// strings like the spreadsheet exports them.
pub fn export_row(no: u64, customer_id: &str, name: &str) -> RecordBuilder {
    RecordBuilder::new()
        .set("no", no)
        .set("ID", customer_id)
        .set("Nama", name)
        .set("Lokasi", "")
        .set("IP", "")
        .set("Latitude", "")
        .set("Longitude", "")
}

/// Canonical dataset record with every managed field present.
pub fn canonical_record(id: u64, customer_id: &str, name: &str) -> RecordBuilder {
    RecordBuilder::new()
        .set("id", id)
        .set("id_pelanggan", customer_id)
        .set("name", name)
        .set("lokasi", "")
        .set("ip", "")
        .set("latitude", 0.0)
        .set("longitude", 0.0)
        .set("status", "ON")
        .set("rto_count", 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_overrides_and_removes() {
        let row = export_row(1, "A1", "Budi")
            .set("Latitude", "-6.2")
            .remove("IP")
            .build();
        assert_eq!(row["Latitude"], json!("-6.2"));
        assert!(row.get("IP").is_none());
        assert_eq!(row["no"], json!(1));
    }

    #[test]
    fn canonical_defaults_are_online() {
        let record = canonical_record(3, "C3", "Sari").build();
        assert_eq!(record["status"], json!("ON"));
        assert_eq!(record["rto_count"], json!(0));
    }
}
