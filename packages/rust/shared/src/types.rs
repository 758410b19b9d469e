//! Job record and job ledger domain types.
//!
//! The ledger is the single source of truth for pipeline progress. It is a
//! JSON array of records, loaded fresh at the start of each stage invocation
//! and rewritten in full after an update.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JobRecord
// ---------------------------------------------------------------------------

/// Persisted state for one URL's progress through the pipeline.
///
/// Both flags are monotone: they go false → true exactly once, each set by
/// its own stage, and never revert. `intermediate_result` is present iff
/// `extracted`; `final_result` is present iff `quiz_created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// The crawl target. Immutable once set.
    pub website_url: String,

    /// Set by the crawl stage after content is durably stored.
    #[serde(default)]
    pub extracted: bool,

    /// Storage key of the fetched content; set together with `extracted`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_result: Option<String>,

    /// Set by the quiz stage after the quiz is durably stored.
    #[serde(default)]
    pub quiz_created: bool,

    /// Storage key of the generated quiz; set together with `quiz_created`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_result: Option<String>,
}

impl JobRecord {
    /// A fresh, queued record for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            website_url: url.into(),
            extracted: false,
            intermediate_result: None,
            quiz_created: false,
            final_result: None,
        }
    }

    /// Mark the record as crawled, recording where the content was stored.
    pub fn mark_extracted(&mut self, stored_key: impl Into<String>) {
        self.extracted = true;
        self.intermediate_result = Some(stored_key.into());
    }

    /// Mark the record's quiz as created, recording where it was stored.
    pub fn mark_quiz_created(&mut self, stored_key: impl Into<String>) {
        self.quiz_created = true;
        self.final_result = Some(stored_key.into());
    }
}

// ---------------------------------------------------------------------------
// JobLedger
// ---------------------------------------------------------------------------

/// The full ordered collection of job records, persisted as one JSON document.
///
/// Insertion order is preserved and defines "first pending" selection, so
/// stage execution is deterministic given a fixed ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobLedger(pub Vec<JobRecord>);

impl JobLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, preserving insertion order.
    pub fn push(&mut self, record: JobRecord) {
        self.0.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over records in ledger order.
    pub fn records(&self) -> impl Iterator<Item = &JobRecord> {
        self.0.iter()
    }

    /// First record not yet crawled, if any.
    pub fn next_crawl_pending(&mut self) -> Option<&mut JobRecord> {
        self.0.iter_mut().find(|r| !r.extracted)
    }

    /// First record crawled but not yet quizzed, if any.
    ///
    /// Requires `intermediate_result` to be set; a record with `extracted`
    /// but no stored key is skipped rather than processed.
    pub fn next_quiz_pending(&mut self) -> Option<&mut JobRecord> {
        self.0
            .iter_mut()
            .find(|r| r.extracted && !r.quiz_created && r.intermediate_result.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> JobLedger {
        let mut ledger = JobLedger::new();
        ledger.push(JobRecord::new("https://a.example"));
        ledger.push(JobRecord::new("https://b.example"));
        ledger
    }

    #[test]
    fn record_defaults() {
        let json = r#"{"website_url": "https://a.example"}"#;
        let record: JobRecord = serde_json::from_str(json).expect("deserialize");
        assert!(!record.extracted);
        assert!(!record.quiz_created);
        assert!(record.intermediate_result.is_none());
        assert!(record.final_result.is_none());
    }

    #[test]
    fn ledger_is_bare_json_array() {
        let ledger = sample_ledger();
        let json = serde_json::to_string(&ledger).expect("serialize");
        assert!(json.starts_with('['));
        // Unset optional fields are omitted on the wire
        assert!(!json.contains("intermediate_result"));
        assert!(!json.contains("final_result"));
    }

    #[test]
    fn ledger_roundtrip_preserves_order_and_fields() {
        let mut ledger = sample_ledger();
        ledger.0[0].mark_extracted("intermediate/a_20250101_120000.txt");

        let json = serde_json::to_string_pretty(&ledger).expect("serialize");
        let parsed: JobLedger = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, ledger);
        assert_eq!(parsed.0[0].website_url, "https://a.example");
        assert_eq!(parsed.0[1].website_url, "https://b.example");
    }

    #[test]
    fn crawl_selection_picks_first_unextracted() {
        let mut ledger = sample_ledger();
        ledger.0[0].mark_extracted("k0");

        let next = ledger.next_crawl_pending().expect("pending record");
        assert_eq!(next.website_url, "https://b.example");
    }

    #[test]
    fn quiz_selection_requires_intermediate_key() {
        let mut ledger = sample_ledger();
        // Extracted but no stored key: malformed, must be skipped
        ledger.0[0].extracted = true;
        ledger.0[1].mark_extracted("intermediate/b.txt");

        let next = ledger.next_quiz_pending().expect("pending record");
        assert_eq!(next.website_url, "https://b.example");
    }

    #[test]
    fn quiz_selection_skips_completed_records() {
        let mut ledger = sample_ledger();
        ledger.0[0].mark_extracted("k0");
        ledger.0[0].mark_quiz_created("f0");

        assert!(ledger.next_quiz_pending().is_none());
    }

    #[test]
    fn flags_are_monotone_through_marks() {
        let mut record = JobRecord::new("https://a.example");
        record.mark_extracted("k0");
        assert!(record.extracted);
        record.mark_quiz_created("f0");
        assert!(record.extracted);
        assert!(record.quiz_created);
        assert_eq!(record.intermediate_result.as_deref(), Some("k0"));
        assert_eq!(record.final_result.as_deref(), Some("f0"));
    }
}
