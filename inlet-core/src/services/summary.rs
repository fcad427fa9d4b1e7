//! Summary service - derived session aggregates
//!
//! The single source of truth for summary shape: both the ingestion path and
//! the query fallback build their metadata through `aggregate`, so the two
//! can never drift apart.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;
use crate::domain::{ImportSession, ImportSummary, ReferenceRecord, SummaryMeta};

/// Upper bound on suggested tags per session
const SUGGESTED_TAG_CAP: usize = 50;

/// Tokenized words taken from each comment field
const COMMENT_TAG_WORDS: usize = 5;

/// Summary service for computing session aggregates
pub struct SummaryService {
    repository: Arc<DuckDbRepository>,
}

impl SummaryService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Recompute a session's summary by scanning its records
    ///
    /// Read-only over the store, so it is safe to call whenever the cached
    /// metadata is missing or stale.
    pub fn compute(&self, session: &ImportSession) -> Result<ImportSummary> {
        let records = self.repository.records_for_session(session.id, None)?;
        let meta = aggregate(&records);
        Ok(ImportSummary::from_parts(session, meta))
    }
}

/// Build summary metadata from a session's records
///
/// Tag derivation order: all explicit labels first, then all trade-group
/// identifiers, then up to five tokenized words per comment; duplicates
/// collapse and the first 50 insertion-ordered entries survive.
pub fn aggregate(records: &[ReferenceRecord]) -> SummaryMeta {
    let mut types_count: BTreeMap<String, i64> = BTreeMap::new();
    let mut currencies: Vec<String> = Vec::new();

    for record in records {
        let n = &record.normalized;

        let tx_type = n
            .tx_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "unknown".to_string());
        *types_count.entry(tx_type).or_insert(0) += 1;

        for currency in [&n.buy_currency, &n.sell_currency, &n.currency, &n.fee_currency]
            .into_iter()
            .flatten()
        {
            push_unique(&mut currencies, currency);
        }
    }

    let mut tags: Vec<String> = Vec::new();
    for record in records {
        if let Some(labels) = &record.normalized.labels {
            for label in labels {
                push_unique(&mut tags, label);
            }
        }
    }
    for record in records {
        if let Some(group) = &record.normalized.trade_group {
            push_unique(&mut tags, group);
        }
    }
    for record in records {
        if let Some(comment) = &record.normalized.comment {
            let words = comment
                .split(['#', ',', ';', '|'])
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .take(COMMENT_TAG_WORDS);
            for word in words {
                push_unique(&mut tags, word);
            }
        }
    }
    tags.truncate(SUGGESTED_TAG_CAP);

    SummaryMeta {
        types_count,
        currencies,
        suggested_tags: tags,
    }
}

fn push_unique(set: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    if !set.iter().any(|existing| existing == value) {
        set.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        NormalizedRecord, Platform, RawRecord, RecordCategory, ReferenceRecord,
    };

    fn record(normalized: NormalizedRecord) -> ReferenceRecord {
        ReferenceRecord {
            id: 0,
            session_id: 1,
            platform: Platform::Cointracking,
            category: RecordCategory::Transaction,
            source_file: None,
            raw: RawRecord::new(),
            normalized,
        }
    }

    #[test]
    fn test_histogram_totals_match_record_count() {
        let records = vec![
            record(NormalizedRecord {
                tx_type: Some("Trade".to_string()),
                ..Default::default()
            }),
            record(NormalizedRecord {
                tx_type: Some("trade".to_string()),
                ..Default::default()
            }),
            record(NormalizedRecord::default()),
        ];

        let meta = aggregate(&records);
        assert_eq!(meta.types_count.get("trade"), Some(&2));
        assert_eq!(meta.types_count.get("unknown"), Some(&1));
        assert_eq!(
            meta.types_count.values().sum::<i64>(),
            records.len() as i64
        );
    }

    #[test]
    fn test_currencies_collect_all_four_legs_in_order() {
        let records = vec![
            record(NormalizedRecord {
                buy_currency: Some("BTC".to_string()),
                sell_currency: Some("EUR".to_string()),
                fee_currency: Some("EUR".to_string()),
                ..Default::default()
            }),
            record(NormalizedRecord {
                currency: Some("USDC".to_string()),
                ..Default::default()
            }),
        ];

        let meta = aggregate(&records);
        assert_eq!(meta.currencies, vec!["BTC", "EUR", "USDC"]);
    }

    #[test]
    fn test_tag_order_labels_then_groups_then_comments() {
        let records = vec![
            record(NormalizedRecord {
                trade_group: Some("DCA".to_string()),
                comment: Some("bought early".to_string()),
                labels: Some(vec!["Trading".to_string()]),
                ..Default::default()
            }),
            record(NormalizedRecord {
                labels: Some(vec!["Staking".to_string(), "Trading".to_string()]),
                ..Default::default()
            }),
        ];

        let meta = aggregate(&records);
        assert_eq!(
            meta.suggested_tags,
            vec!["Trading", "Staking", "DCA", "bought early"]
        );
    }

    #[test]
    fn test_comment_tokens_capped_per_comment() {
        let records = vec![record(NormalizedRecord {
            comment: Some("a#b#c#d#e#f#g".to_string()),
            ..Default::default()
        })];

        let meta = aggregate(&records);
        assert_eq!(meta.suggested_tags, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_tags_truncate_at_fifty() {
        let labels: Vec<String> = (0..80).map(|i| format!("tag-{i}")).collect();
        let records = vec![record(NormalizedRecord {
            labels: Some(labels),
            ..Default::default()
        })];

        let meta = aggregate(&records);
        assert_eq!(meta.suggested_tags.len(), 50);
        assert_eq!(meta.suggested_tags[0], "tag-0");
        assert_eq!(meta.suggested_tags[49], "tag-49");
    }

    #[test]
    fn test_empty_session_aggregates_to_empty_meta() {
        let meta = aggregate(&[]);
        assert!(meta.types_count.is_empty());
        assert!(meta.currencies.is_empty());
        assert!(meta.suggested_tags.is_empty());
        assert!(meta.is_empty());
    }
}
