//! Canonical field resolution and typed coercion
//!
//! Export headers drift between platform versions: `"Trade Date"` vs
//! `"TradeDate"` vs `"trade date"`. Resolution walks a static candidate-key
//! table per canonical field and, for each candidate, probes the exact,
//! lower-cased, and whitespace-stripped spellings, taking the first value
//! that is neither null nor empty text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::record::{NormalizedRecord, RawRecord, RawValue};

const DATE_KEYS: &[&str] = &["Date", "Trade Date", "Buy Date"];
const TYPE_KEYS: &[&str] = &["Type", "Trade Type"];
const BUY_AMOUNT_KEYS: &[&str] = &["Buy Amount"];
const BUY_CURRENCY_KEYS: &[&str] = &["Buy Currency"];
const SELL_AMOUNT_KEYS: &[&str] = &["Sell Amount"];
const SELL_CURRENCY_KEYS: &[&str] = &["Sell Currency"];
const AMOUNT_KEYS: &[&str] = &["Amount"];
const CURRENCY_KEYS: &[&str] = &["Currency"];
const FEE_AMOUNT_KEYS: &[&str] = &["Fee", "Fee Amount"];
const FEE_CURRENCY_KEYS: &[&str] = &["Fee Currency"];
const EXCHANGE_KEYS: &[&str] = &["Exchange", "Location"];
const TRADE_GROUP_KEYS: &[&str] = &["Trade-Group", "Trade Group"];
const COMMENT_KEYS: &[&str] = &["Comment", "Notes"];
const LABEL_KEYS: &[&str] = &["Label", "Labels"];

/// Datetime formats seen across platform exports, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
];

/// Project one raw record onto the canonical schema
///
/// Pure and deterministic: the same raw record always yields the same
/// normalized record. Coercion failures degrade to absent fields.
pub fn normalize_record(raw: &RawRecord) -> NormalizedRecord {
    NormalizedRecord {
        date: resolve(raw, DATE_KEYS).and_then(coerce_date),
        tx_type: resolve_text(raw, TYPE_KEYS),
        buy_amount: resolve(raw, BUY_AMOUNT_KEYS).and_then(coerce_number),
        buy_currency: resolve_text(raw, BUY_CURRENCY_KEYS),
        sell_amount: resolve(raw, SELL_AMOUNT_KEYS).and_then(coerce_number),
        sell_currency: resolve_text(raw, SELL_CURRENCY_KEYS),
        amount: resolve(raw, AMOUNT_KEYS).and_then(coerce_number),
        currency: resolve_text(raw, CURRENCY_KEYS),
        fee_amount: resolve(raw, FEE_AMOUNT_KEYS).and_then(coerce_number),
        fee_currency: resolve_text(raw, FEE_CURRENCY_KEYS),
        exchange: resolve_text(raw, EXCHANGE_KEYS),
        trade_group: resolve_text(raw, TRADE_GROUP_KEYS),
        comment: resolve_text(raw, COMMENT_KEYS),
        labels: resolve_text(raw, LABEL_KEYS).and_then(|s| split_labels(&s)),
    }
}

/// First non-missing value across the candidate keys and their spelling
/// variants
fn resolve<'a>(raw: &'a RawRecord, candidates: &[&str]) -> Option<&'a RawValue> {
    for key in candidates {
        let probes = [key.to_string(), key.to_lowercase(), strip_whitespace(key)];
        for probe in &probes {
            if let Some(value) = raw.get(probe) {
                if !value.is_missing() {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn resolve_text(raw: &RawRecord, candidates: &[&str]) -> Option<String> {
    resolve(raw, candidates).and_then(RawValue::to_text)
}

fn strip_whitespace(key: &str) -> String {
    key.chars().filter(|c| !c.is_whitespace()).collect()
}

fn coerce_number(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(n) if n.is_finite() => Some(*n),
        RawValue::Number(_) => None,
        RawValue::Text(s) => parse_decimal(s),
        RawValue::Null => None,
    }
}

/// Parse a decimal that may use either locale convention
///
/// When both separators appear, the later one is the decimal point and the
/// other is a grouping mark; a lone comma is a decimal point. `"1.234,56"`
/// and `"1,234.56"` both come out as 1234.56.
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let cleaned = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => s.replace(',', "."),
        _ => s.to_string(),
    };

    cleaned.parse::<f64>().ok()
}

fn coerce_date(value: &RawValue) -> Option<DateTime<Utc>> {
    match value {
        RawValue::Text(s) => parse_date(s),
        // Epoch milliseconds, as JSON exports carry them
        RawValue::Number(n) if n.is_finite() => {
            Utc.timestamp_millis_opt(*n as i64).single()
        }
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Split a label field on `;`, `,`, or `|`, dropping empty pieces
///
/// An empty result normalizes to absent, so a blank labels column and a
/// missing one contribute the same to aggregation.
fn split_labels(s: &str) -> Option<Vec<String>> {
    let labels: Vec<String> = s
        .split([';', ',', '|'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(labels)
    }
}
