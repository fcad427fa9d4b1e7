//! Reference record entities: raw rows as parsed, plus their canonical
//! normalized projection

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::platform::Platform;

/// A single cell value as it came out of a parser
///
/// Parsers must close every cell into this type; booleans and nested
/// structures are stringified. Serializes to the matching JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Null,
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Null and empty text both count as missing during field resolution
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) => false,
        }
    }

    /// Render as text for string-typed canonical fields
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) => Some(format_number(*n)),
            RawValue::Null => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One row exactly as parsed: an insertion-ordered mapping from field name
/// to raw value
///
/// Serializes to a JSON object preserving field order, which is why this is
/// not a plain map type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: RawValue) {
        self.fields.push((key.into(), value));
    }

    /// First value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawRecordVisitor;

        impl<'de> Visitor<'de> for RawRecordVisitor {
            type Value = RawRecord;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of field names to raw values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRecord, A::Error> {
                let mut record = RawRecord::new();
                while let Some((key, value)) = access.next_entry::<String, RawValue>()? {
                    record.push(key, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RawRecordVisitor)
    }
}

/// Canonical, platform-agnostic projection of a raw record
///
/// Every field is optional: source platforms populate different subsets, and
/// a value that fails typed coercion degrades to absent rather than failing
/// the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_currency: Option<String>,
    /// Single-leg exports carry one amount/currency pair instead of buy/sell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Kind of reference data a record carries
///
/// Only `Transaction` is produced today; the other members are reserved for
/// future record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCategory {
    Transaction,
    Label,
    Other,
}

impl RecordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Transaction => "transaction",
            RecordCategory::Label => "label",
            RecordCategory::Other => "other",
        }
    }

    pub fn from_tag(tag: &str) -> RecordCategory {
        match tag {
            "transaction" => RecordCategory::Transaction,
            "label" => RecordCategory::Label,
            _ => RecordCategory::Other,
        }
    }
}

/// A record as it goes into the store, before an identifier is assigned
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub category: RecordCategory,
    /// Archive entry the record came from, when the source was a zip
    pub source_file: Option<String>,
    pub raw: RawRecord,
    pub normalized: NormalizedRecord,
}

/// A stored reference record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    pub id: i64,
    pub session_id: i64,
    pub platform: Platform,
    pub category: RecordCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub raw: RawRecord,
    pub normalized: NormalizedRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_preserves_insertion_order() {
        let mut record = RawRecord::new();
        record.push("Zeta", RawValue::Text("1".to_string()));
        record.push("Alpha", RawValue::Number(2.0));
        record.push("Mid", RawValue::Null);

        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":2.0,"Mid":null}"#);
    }

    #[test]
    fn test_raw_record_json_round_trip() {
        let mut record = RawRecord::new();
        record.push("Type", RawValue::Text("Trade".to_string()));
        record.push("Buy Amount", RawValue::Number(0.5));
        record.push("Comment", RawValue::Null);

        let json = serde_json::to_string(&record).unwrap();
        let back: RawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_values() {
        assert!(RawValue::Null.is_missing());
        assert!(RawValue::Text("  ".to_string()).is_missing());
        assert!(!RawValue::Text("0".to_string()).is_missing());
        assert!(!RawValue::Number(0.0).is_missing());
    }

    #[test]
    fn test_number_renders_without_trailing_zeros() {
        assert_eq!(RawValue::Number(3.0).to_text().unwrap(), "3");
        assert_eq!(RawValue::Number(3.25).to_text().unwrap(), "3.25");
    }

    #[test]
    fn test_normalized_record_serializes_compact() {
        let normalized = NormalizedRecord {
            tx_type: Some("Trade".to_string()),
            buy_amount: Some(1.5),
            ..Default::default()
        };
        let json = serde_json::to_string(&normalized).unwrap();
        assert_eq!(json, r#"{"type":"Trade","buyAmount":1.5}"#);
    }
}
