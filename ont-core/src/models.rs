//! Canonical ONT record as stored in the dataset file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Operational status of an ONT.
///
/// Only `ON` is considered online. Any other string found in the dataset is
/// kept verbatim so a round trip never rewrites values this tool does not know.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OntStatus {
    #[default]
    On,
    Off,
    Other(String),
}

impl OntStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, OntStatus::On)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OntStatus::On => "ON",
            OntStatus::Off => "OFF",
            OntStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for OntStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ON" => OntStatus::On,
            "OFF" => OntStatus::Off,
            _ => OntStatus::Other(raw),
        }
    }
}

impl From<OntStatus> for String {
    fn from(status: OntStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OntStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ONT entry of the canonical dataset (`data/onts.json`).
///
/// Fields are read leniently: a hand-edited file with `"id_pelanggan": 1001`
/// or `"latitude": "-6.2"` still loads instead of failing the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntRecord {
    /// Internal sequential id, never reused
    #[serde(deserialize_with = "lenient::unsigned")]
    pub id: u64,
    /// Customer id, the upsert key
    #[serde(deserialize_with = "lenient::text")]
    pub id_pelanggan: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Free-text location label
    #[serde(deserialize_with = "lenient::text")]
    pub lokasi: String,
    #[serde(deserialize_with = "lenient::text")]
    pub ip: String,
    #[serde(deserialize_with = "lenient::coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::coordinate")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient::status")]
    pub status: OntStatus,
    /// Consecutive ping time-outs
    #[serde(deserialize_with = "lenient::counter")]
    pub rto_count: u32,
    /// Keys this tool does not manage, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for OntRecord {
    fn default() -> Self {
        Self {
            id: 0,
            id_pelanggan: String::new(),
            name: String::new(),
            lokasi: String::new(),
            ip: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            status: OntStatus::On,
            rto_count: 0,
            extra: Map::new(),
        }
    }
}

mod lenient {
    use super::OntStatus;
    use crate::convert::{coerce_coordinate, coerce_text, coerce_unsigned};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Value::deserialize(d).map(|v| coerce_text(Some(&v)))
    }

    pub fn unsigned<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Value::deserialize(d).map(|v| coerce_unsigned(Some(&v)))
    }

    pub fn counter<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let raw = unsigned(d)?;
        Ok(u32::try_from(raw).unwrap_or(u32::MAX))
    }

    pub fn coordinate<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Value::deserialize(d).map(|v| coerce_coordinate(Some(&v)))
    }

    pub fn status<'de, D: Deserializer<'de>>(d: D) -> Result<OntStatus, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => OntStatus::default(),
            Value::String(raw) => OntStatus::from(raw),
            other => OntStatus::Other(other.to_string()),
        })
    }
}

/// Raw record of the CSV-derived export (`data/csvjson.json`).
///
/// The export is loosely typed (numbers and strings mixed), so it stays a
/// plain JSON value until the converter picks the fields it needs.
pub type SourceRecord = Value;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_unknown_values() {
        let status: OntStatus = serde_json::from_value(json!("RTO")).unwrap();
        assert_eq!(status, OntStatus::Other("RTO".into()));
        assert!(!status.is_online());
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("RTO"));
    }

    #[test]
    fn record_keeps_extra_keys() {
        let raw = json!({
            "id": 7,
            "id_pelanggan": "A7",
            "name": "Warung",
            "status": "OFF",
            "rto_count": 2,
            "last_ping": "2024-01-01 10:00:00"
        });
        let record: OntRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.status, OntStatus::Off);
        assert_eq!(record.lokasi, "");
        assert_eq!(record.extra.get("last_ping"), Some(&json!("2024-01-01 10:00:00")));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["last_ping"], json!("2024-01-01 10:00:00"));
        assert_eq!(back["status"], json!("OFF"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let record: OntRecord = serde_json::from_value(json!({"id_pelanggan": "X"})).unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(record.status, OntStatus::On);
        assert_eq!(record.rto_count, 0);
        assert_eq!(record.latitude, 0.0);
    }

    #[test]
    fn mistyped_fields_are_coerced() {
        let raw = json!({
            "id": "12",
            "id_pelanggan": 1001,
            "name": true,
            "ip": null,
            "latitude": "-6.2",
            "longitude": null,
            "status": null,
            "rto_count": 3.0
        });
        let record: OntRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.id_pelanggan, "1001");
        assert_eq!(record.name, "true");
        assert_eq!(record.ip, "");
        assert_eq!(record.latitude, -6.2);
        assert_eq!(record.longitude, 0.0);
        assert_eq!(record.status, OntStatus::On);
        assert_eq!(record.rto_count, 3);
    }
}
