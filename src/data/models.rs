//! Data models for saved chart records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of chart a record holds. Bar and pie records live in
/// separate collections and never intermix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

impl ChartKind {
    /// Storage key the collection is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            ChartKind::Bar => "saved-bar-charts",
            ChartKind::Pie => "saved-pie-charts",
        }
    }

    /// Collection index, used for per-collection locking.
    pub(crate) fn index(self) -> usize {
        match self {
            ChartKind::Bar => 0,
            ChartKind::Pie => 1,
        }
    }

    /// Human-readable name for titles and status messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

/// One labeled, colored, numeric entry within a chart's data set.
///
/// The store does not validate any of these fields: labels need not be
/// unique, values may be non-positive, and colors are free-form hex
/// strings. Rendering decides what to do with odd inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
    pub color: String,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        DataPoint {
            label: label.into(),
            value,
            color: color.into(),
        }
    }
}

/// A saved chart configuration as persisted in a collection.
///
/// `id` is assigned by the store at save time and is unique within the
/// record's collection. `timestamp` is set by the caller when the draft
/// is built. Records are never mutated in place; "editing" a saved chart
/// means saving a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Ordered data points; order is display order.
    pub data: Vec<DataPoint>,
    pub timestamp: DateTime<Utc>,
}

/// Input to [`ChartStore::save`](crate::data::ChartStore::save): a record
/// without an `id`. The store generates the identifier.
#[derive(Debug, Clone)]
pub struct ChartDraft {
    pub kind: ChartKind,
    pub data: Vec<DataPoint>,
    pub timestamp: DateTime<Utc>,
}

impl ChartDraft {
    pub fn new(kind: ChartKind, data: Vec<DataPoint>, timestamp: DateTime<Utc>) -> Self {
        ChartDraft {
            kind,
            data,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(ChartKind::Bar.storage_key(), "saved-bar-charts");
        assert_eq!(ChartKind::Pie.storage_key(), "saved-pie-charts");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChartKind::Bar).unwrap(), "\"bar\"");
        assert_eq!(serde_json::to_string(&ChartKind::Pie).unwrap(), "\"pie\"");
    }

    #[test]
    fn test_record_wire_shape() {
        let record = ChartRecord {
            id: "abc".to_string(),
            kind: ChartKind::Bar,
            data: vec![DataPoint::new("A", 10.0, "#fff")],
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        // Field names are part of the on-disk format.
        assert_eq!(json["id"], "abc");
        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"][0]["label"], "A");
        assert_eq!(json["data"][0]["value"], 10.0);
        assert_eq!(json["data"][0]["color"], "#fff");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = ChartRecord {
            id: "xyz".to_string(),
            kind: ChartKind::Pie,
            data: vec![
                DataPoint::new("Mobile", 42.0, "#3B82F6"),
                DataPoint::new("Desktop", 35.0, "#10B981"),
            ],
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ChartRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
