use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One analysis pass result for a file.
///
/// Iterations are immutable once created and appended to a per-file history
/// by the analysis engine. Insertion order is chronological in the common
/// case, but consumers re-sort by `timestamp_ms` defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisIteration {
    /// Raw classification confidence reported by the analysis engine.
    pub confidence: f64,

    /// Type label assigned in this pass (e.g. "technical-note", "decision").
    pub label: String,

    /// Categories suggested in this pass. A `BTreeSet` keeps iteration
    /// order deterministic across repeated evaluations.
    pub categories: BTreeSet<String>,

    /// When this pass completed, in unix milliseconds.
    pub timestamp_ms: u64,
}

impl AnalysisIteration {
    /// Create an iteration, clamping confidence into [0, 1].
    pub fn new(
        confidence: f64,
        label: impl Into<String>,
        categories: impl IntoIterator<Item = String>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
            label: label.into(),
            categories: categories.into_iter().collect(),
            timestamp_ms,
        }
    }
}

/// Ordered per-file sequence of analysis iterations, owned by the caller.
pub type AnalysisHistory = Vec<AnalysisIteration>;

/// A raw record returned by the vector similarity search service.
///
/// The payload is an opaque field map owned by the collaborator; the
/// identity resolver only reads a handful of well-known string fields
/// out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecord {
    /// The collaborator's identifier for this record.
    pub external_id: String,

    /// Raw similarity score in the collaborator's own domain.
    pub raw_score: f64,

    /// Arbitrary payload fields attached to the record.
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
}

impl ExternalRecord {
    pub fn new(external_id: impl Into<String>, raw_score: f64) -> Self {
        Self {
            external_id: external_id.into(),
            raw_score,
            payload: HashMap::new(),
        }
    }

    /// Attach a string payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Read a payload field as a string, if present and string-typed.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn iteration_clamps_confidence() {
        let it = AnalysisIteration::new(1.4, "note", vec![], 1_000);
        assert_eq!(it.confidence, 1.0);

        let it = AnalysisIteration::new(-0.2, "note", vec![], 1_000);
        assert_eq!(it.confidence, 0.0);
    }

    #[test]
    fn record_payload_access() {
        let record = ExternalRecord::new("doc-1", 12.5)
            .with_field("sourceFile", "notes/report.md")
            .with_field("title", "Report");

        assert_eq!(record.payload_str("sourceFile"), Some("notes/report.md"));
        assert_eq!(record.payload_str("missing"), None);
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = ExternalRecord::new("doc-1", 21.5).with_field("file", "a.md");
        let json = serde_json::to_string(&record).unwrap();
        let back: ExternalRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
