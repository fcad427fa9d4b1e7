//! Derived import summary types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use super::session::ImportSession;
use crate::format::FileKind;

/// Aggregated metadata cached on a session after ingestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMeta {
    /// Occurrence count per lower-cased transaction type
    #[serde(default)]
    pub types_count: BTreeMap<String, i64>,
    /// Distinct currency codes across buy/sell/single/fee legs, in the
    /// order first encountered
    #[serde(default)]
    pub currencies: Vec<String>,
    /// Bounded, deduplicated tag candidates from labels, trade groups, and
    /// comment text
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

impl SummaryMeta {
    /// Cached metadata only short-circuits recomputation when both the type
    /// histogram and the currency list carry entries
    pub fn is_empty(&self) -> bool {
        self.types_count.is_empty() || self.currencies.is_empty()
    }
}

/// The summary returned to callers, identical in shape whether it was read
/// from the session cache or recomputed from the records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub session_id: i64,
    pub platform: Platform,
    pub file_name: String,
    pub file_kind: FileKind,
    pub created_at: DateTime<Utc>,
    pub record_count: i64,
    #[serde(flatten)]
    pub meta: SummaryMeta,
}

impl ImportSummary {
    pub fn from_parts(session: &ImportSession, meta: SummaryMeta) -> Self {
        Self {
            session_id: session.id,
            platform: session.platform,
            file_name: session.file_name.clone(),
            file_kind: session.file_kind,
            created_at: session.created_at,
            record_count: session.record_count,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_counts_as_empty_without_currencies() {
        let mut meta = SummaryMeta::default();
        assert!(meta.is_empty());

        meta.types_count.insert("trade".to_string(), 3);
        assert!(meta.is_empty());

        meta.currencies.push("BTC".to_string());
        assert!(!meta.is_empty());
    }

    #[test]
    fn test_meta_json_shape() {
        let mut meta = SummaryMeta::default();
        meta.types_count.insert("deposit".to_string(), 1);
        meta.currencies.push("EUR".to_string());
        meta.suggested_tags.push("Staking".to_string());

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["typesCount"]["deposit"], 1);
        assert_eq!(json["currencies"][0], "EUR");
        assert_eq!(json["suggestedTags"][0], "Staking");
    }
}
