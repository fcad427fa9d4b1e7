//! JSON parser

use serde_json::Value;

use crate::domain::result::{Error, Result};
use crate::domain::{RawRecord, RawValue};

/// Parse JSON bytes into raw records
///
/// Accepts a top-level array of objects, an object carrying a `rows` array,
/// or a single bare object treated as one record. Non-object elements parse
/// to nothing rather than producing unusable records.
pub(crate) fn parse(file: &str, bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let data: Value = serde_json::from_slice(bytes).map_err(|e| Error::malformed(file, e))?;

    let rows = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("rows") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("rows".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };

    Ok(rows.into_iter().filter_map(record_from_value).collect())
}

fn record_from_value(value: Value) -> Option<RawRecord> {
    let Value::Object(map) = value else {
        return None;
    };

    let mut raw = RawRecord::new();
    for (key, value) in map {
        raw.push(key, raw_value_from_json(value));
    }
    Some(raw)
}

/// Close an arbitrary JSON scalar into the raw value variant
fn raw_value_from_json(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Text(b.to_string()),
        Value::Number(n) => RawValue::Number(n.as_f64().unwrap_or_default()),
        Value::String(s) => RawValue::Text(s),
        // Nested structures stringify rather than widening the value type
        other => RawValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_array() {
        let data = br#"[{"Type":"Trade","Amount":1.5},{"Type":"Deposit","Amount":null}]"#;
        let records = parse("trades.json", data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Amount"), Some(&RawValue::Number(1.5)));
        assert_eq!(records[1].get("Amount"), Some(&RawValue::Null));
    }

    #[test]
    fn test_rows_wrapper_object() {
        let data = br#"{"exported":"2025-01-15","rows":[{"Type":"Trade"},{"Type":"Staking"}]}"#;
        let records = parse("trades.json", data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1].get("Type"),
            Some(&RawValue::Text("Staking".to_string()))
        );
    }

    #[test]
    fn test_bare_object_is_one_record() {
        let data = br#"{"Type":"Trade","rows":"not an array"}"#;
        let records = parse("trades.json", data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("Type"),
            Some(&RawValue::Text("Trade".to_string()))
        );
    }

    #[test]
    fn test_scalars_close_into_raw_values() {
        let data = br#"[{"a":"x","b":2,"c":true,"d":null,"e":[1,2]}]"#;
        let records = parse("trades.json", data).unwrap();
        let record = &records[0];
        assert_eq!(record.get("a"), Some(&RawValue::Text("x".to_string())));
        assert_eq!(record.get("b"), Some(&RawValue::Number(2.0)));
        assert_eq!(record.get("c"), Some(&RawValue::Text("true".to_string())));
        assert_eq!(record.get("d"), Some(&RawValue::Null));
        assert_eq!(record.get("e"), Some(&RawValue::Text("[1,2]".to_string())));
    }

    #[test]
    fn test_non_object_elements_are_dropped() {
        let records = parse("trades.json", br#"[1,"two",{"Type":"Trade"}]"#).unwrap();
        assert_eq!(records.len(), 1);

        let records = parse("trades.json", br#""just a string""#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse("trades.json", b"{not json").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedContent { file, .. } if file == "trades.json"
        ));
    }
}
