//! Identity resolution between the similarity search collaborator and the
//! internal file identifiers.
//!
//! Records arrive with whatever identifiers the search service carries:
//! point ids, source paths, titles, any casing. Every plausible identifier
//! is registered up front, together with lower-cased, basename, and
//! extension-stripped variants, so the common lookups are a single map hit
//! and only genuinely messy identifiers fall through to the fuzzy scan.

use crate::types::MatchKind;
use consolidator_protocol::similarity::{edit_similarity, jaccard_similarity};
use consolidator_protocol::ExternalRecord;
use std::collections::HashMap;

/// Minimum similarity for a fuzzy candidate to win a lookup.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.6;

/// Payload fields checked for identifier candidates, in priority order
/// after the record's own id. These are the fields the production
/// collection actually carries.
const PAYLOAD_ID_FIELDS: &[&str] = &["sourceFile", "file", "fileName", "path", "title"];

/// Immutable identifier mapping built from one batch of external records.
///
/// Rebuilding replaces the whole mapping; there is no incremental update.
/// Lookups are read-only, so a built resolver is freely shareable across
/// threads.
#[derive(Debug)]
pub struct IdentityResolver {
    records: Vec<RecordRef>,
    keys: Vec<KeyEntry>,
    by_key: HashMap<String, usize>,
}

/// What a lookup ultimately resolves to.
#[derive(Debug, Clone)]
pub(crate) struct RecordRef {
    pub internal_id: String,
    pub raw_score: f64,
}

#[derive(Debug)]
struct KeyEntry {
    key: String,
    /// Pre-computed lower-cased key for the fuzzy scan.
    key_lower: String,
    record: usize,
    /// What a hit on this key means: `Exact` for verbatim identifiers,
    /// `NormalizedCaseInsensitive` for derived variants.
    origin: MatchKind,
}

impl IdentityResolver {
    /// Build the mapping for a batch of records.
    ///
    /// The internal file id for a record is its `sourceFile`/`file`
    /// payload value when present, otherwise the external id itself.
    /// First registration wins a key, so earlier records take precedence
    /// on identifier collisions.
    pub fn build(batch: &[ExternalRecord]) -> Self {
        let mut resolver = Self {
            records: Vec::with_capacity(batch.len()),
            keys: Vec::new(),
            by_key: HashMap::new(),
        };

        for record in batch {
            let internal_id = record
                .payload_str("sourceFile")
                .or_else(|| record.payload_str("file"))
                .unwrap_or(&record.external_id)
                .to_string();

            let record_idx = resolver.records.len();
            resolver.records.push(RecordRef {
                internal_id,
                raw_score: record.raw_score,
            });

            let mut candidates: Vec<&str> = vec![&record.external_id];
            for field in PAYLOAD_ID_FIELDS {
                if let Some(value) = record.payload_str(field) {
                    candidates.push(value);
                }
            }

            for candidate in candidates {
                resolver.register_with_variants(candidate, record_idx);
            }
        }

        log::debug!(
            "identity mapping built: {} records, {} keys",
            resolver.records.len(),
            resolver.keys.len()
        );
        resolver
    }

    /// Register a candidate identifier plus its lower-cased, basename,
    /// and extension-stripped variants.
    fn register_with_variants(&mut self, candidate: &str, record: usize) {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return;
        }

        self.register(candidate, record, MatchKind::Exact);
        self.register(
            &candidate.to_lowercase(),
            record,
            MatchKind::NormalizedCaseInsensitive,
        );

        let base = basename(candidate);
        self.register(base, record, MatchKind::NormalizedCaseInsensitive);
        self.register(
            &base.to_lowercase(),
            record,
            MatchKind::NormalizedCaseInsensitive,
        );

        let stem = strip_extension(base);
        self.register(stem, record, MatchKind::NormalizedCaseInsensitive);
        self.register(
            &stem.to_lowercase(),
            record,
            MatchKind::NormalizedCaseInsensitive,
        );
    }

    fn register(&mut self, key: &str, record: usize, origin: MatchKind) {
        if key.is_empty() || self.by_key.contains_key(key) {
            return;
        }
        self.by_key.insert(key.to_string(), self.keys.len());
        self.keys.push(KeyEntry {
            key: key.to_string(),
            key_lower: key.to_lowercase(),
            record,
            origin,
        });
    }

    /// Resolve an external identifier. Returns `None` when nothing clears
    /// the fuzzy threshold: callers treat that as "unscored".
    pub fn lookup(&self, query: &str) -> Option<(&str, f64, MatchKind)> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        // 1. Exact key.
        if let Some(&idx) = self.by_key.get(query) {
            let entry = &self.keys[idx];
            return Some(self.hit(entry.record, entry.origin));
        }

        // 2. Case-normalized key.
        let query_lower = query.to_lowercase();
        if let Some(&idx) = self.by_key.get(&query_lower) {
            let entry = &self.keys[idx];
            return Some(self.hit(entry.record, MatchKind::NormalizedCaseInsensitive));
        }

        // 3. Fuzzy scan, tiered by priority. Linear over all keys;
        //    batches are a few hundred records, not millions.
        self.fuzzy_lookup(&query_lower)
    }

    fn fuzzy_lookup(&self, query_lower: &str) -> Option<(&str, f64, MatchKind)> {
        let query_base = basename(query_lower);
        let query_stem = strip_extension(query_base);

        for entry in &self.keys {
            if basename(&entry.key_lower) == query_base {
                log::debug!("fuzzy basename match: '{query_lower}' -> '{}'", entry.key);
                return Some(self.hit(entry.record, MatchKind::NormalizedCaseInsensitive));
            }
        }

        for entry in &self.keys {
            if strip_extension(basename(&entry.key_lower)) == query_stem {
                log::debug!("fuzzy stem match: '{query_lower}' -> '{}'", entry.key);
                return Some(self.hit(entry.record, MatchKind::NormalizedCaseInsensitive));
            }
        }

        if let Some((entry, similarity)) =
            self.best_by(|key| jaccard_similarity(query_lower, key))
        {
            log::debug!(
                "fuzzy jaccard match: '{query_lower}' -> '{}' ({similarity:.2})",
                entry.key
            );
            return Some(self.hit(entry.record, MatchKind::FuzzyJaccard));
        }

        if let Some((entry, similarity)) = self.best_by(|key| edit_similarity(query_lower, key)) {
            log::debug!(
                "fuzzy edit-distance match: '{query_lower}' -> '{}' ({similarity:.2})",
                entry.key
            );
            return Some(self.hit(entry.record, MatchKind::FuzzyEditDistance));
        }

        None
    }

    /// Highest-scoring key at or above the fuzzy threshold; ties keep the
    /// earliest-registered key.
    fn best_by(&self, score: impl Fn(&str) -> f64) -> Option<(&KeyEntry, f64)> {
        let mut best: Option<(&KeyEntry, f64)> = None;
        for entry in &self.keys {
            let similarity = score(&entry.key_lower);
            if similarity < FUZZY_MATCH_THRESHOLD {
                continue;
            }
            if best.map(|(_, s)| similarity > s).unwrap_or(true) {
                best = Some((entry, similarity));
            }
        }
        best
    }

    fn hit(&self, record: usize, kind: MatchKind) -> (&str, f64, MatchKind) {
        let record = &self.records[record];
        (record.internal_id.as_str(), record.raw_score, kind)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn batch() -> Vec<ExternalRecord> {
        vec![
            ExternalRecord::new("point-1", 30.0).with_field("sourceFile", "docs/Report-Final.md"),
            ExternalRecord::new("point-2", 10.0).with_field("sourceFile", "notes/meeting.md"),
        ]
    }

    #[test]
    fn exact_id_lookup() {
        let resolver = IdentityResolver::build(&batch());
        let (id, raw, kind) = resolver.lookup("point-1").unwrap();
        assert_eq!(id, "docs/Report-Final.md");
        assert_eq!(raw, 30.0);
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn case_insensitive_lookup() {
        let resolver = IdentityResolver::build(&batch());
        let (id, _, kind) = resolver.lookup("DOCS/REPORT-FINAL.MD").unwrap();
        assert_eq!(id, "docs/Report-Final.md");
        assert_eq!(kind, MatchKind::NormalizedCaseInsensitive);
    }

    #[test]
    fn basename_and_stem_variants_are_registered() {
        let resolver = IdentityResolver::build(&batch());

        // The basename is a derived variant of the full path candidate.
        let (id, _, kind) = resolver.lookup("Report-Final.md").unwrap();
        assert_eq!(id, "docs/Report-Final.md");
        assert_eq!(kind, MatchKind::NormalizedCaseInsensitive);

        let (id, _, kind) = resolver.lookup("report-final").unwrap();
        assert_eq!(id, "docs/Report-Final.md");
        assert_eq!(kind, MatchKind::NormalizedCaseInsensitive);
    }

    #[test]
    fn fuzzy_lookup_tolerates_small_edits() {
        let resolver = IdentityResolver::build(&batch());
        // One transposition away from "meeting"; no registered key matches
        // exactly or by basename.
        let (id, _, kind) = resolver.lookup("meetign").unwrap();
        assert_eq!(id, "notes/meeting.md");
        assert!(matches!(
            kind,
            MatchKind::FuzzyJaccard | MatchKind::FuzzyEditDistance
        ));
    }

    #[test]
    fn unmatched_query_returns_none() {
        let resolver = IdentityResolver::build(&batch());
        assert!(resolver.lookup("zzzz-qqqq-7777").is_none());
        assert!(resolver.lookup("").is_none());
    }

    #[test]
    fn earlier_record_wins_key_collisions() {
        let records = vec![
            ExternalRecord::new("dup.md", 10.0),
            ExternalRecord::new("dup.md", 99.0),
        ];
        let resolver = IdentityResolver::build(&records);
        let (_, raw, _) = resolver.lookup("dup.md").unwrap();
        assert_eq!(raw, 10.0);
    }

    #[test]
    fn internal_id_falls_back_to_external_id() {
        let records = vec![ExternalRecord::new("standalone.md", 5.0)];
        let resolver = IdentityResolver::build(&records);
        let (id, _, _) = resolver.lookup("standalone.md").unwrap();
        assert_eq!(id, "standalone.md");
    }

    #[test]
    fn title_field_is_a_candidate() {
        let records = vec![ExternalRecord::new("p1", 12.0)
            .with_field("sourceFile", "a/b/c.md")
            .with_field("title", "Quarterly Review")];
        let resolver = IdentityResolver::build(&records);
        let (id, _, kind) = resolver.lookup("quarterly review").unwrap();
        assert_eq!(id, "a/b/c.md");
        assert_eq!(kind, MatchKind::NormalizedCaseInsensitive);
    }
}
