use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::normalizer::normalize;
use crate::resolver::IdentityResolver;
use crate::types::{Method, NormalizedConfidence, ResolvedIdentity};
use consolidator_protocol::ExternalRecord;
use std::sync::RwLock;

/// Facade tying identity resolution to score normalization.
///
/// The mapping lives for the collaborator session: it is replaced by the
/// next `resolve_identity` and dropped by `reset`, never expired by time.
/// A `RwLock` gives the single-writer/many-reader discipline: rebuilds
/// are rare, lookups are the hot path.
pub struct ScoreBridge {
    config: BridgeConfig,
    resolver: RwLock<Option<IdentityResolver>>,
}

impl ScoreBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            resolver: RwLock::new(None),
        }
    }

    /// Build (or rebuild) the identity mapping from a batch of records.
    /// Idempotent; the previous mapping is replaced wholesale.
    pub fn resolve_identity(&self, records: &[ExternalRecord]) {
        let resolver = IdentityResolver::build(records);
        *self
            .resolver
            .write()
            .expect("identity mapping lock poisoned") = Some(resolver);
    }

    /// Drop the mapping. Subsequent lookups return the unmatched default
    /// until the next `resolve_identity`.
    pub fn reset(&self) {
        *self
            .resolver
            .write()
            .expect("identity mapping lock poisoned") = None;
    }

    /// Look up a confidence with the configured default method.
    ///
    /// Never fails: an unmapped identifier (or a bridge with no mapping
    /// yet) yields `NormalizedConfidence::unmatched()` so one bad record
    /// cannot abort a batch render.
    pub fn lookup_confidence(&self, query: &str) -> NormalizedConfidence {
        self.lookup_confidence_with(query, self.config.default_method)
    }

    /// Look up a confidence with an explicit normalization method.
    pub fn lookup_confidence_with(&self, query: &str, method: Method) -> NormalizedConfidence {
        let guard = self
            .resolver
            .read()
            .expect("identity mapping lock poisoned");
        let Some(resolver) = guard.as_ref() else {
            log::debug!("confidence lookup before any identity resolution: '{query}'");
            return NormalizedConfidence::unmatched();
        };

        match resolver.lookup(query) {
            Some((_, raw_score, match_kind)) => NormalizedConfidence {
                score: normalize(raw_score, method, &self.config.calibration),
                raw_score,
                method,
                match_kind,
            },
            None => {
                log::debug!("no identity mapping for '{query}'");
                NormalizedConfidence::unmatched()
            }
        }
    }

    /// Strict lookup for hosts that need "unresolved" as a distinct error
    /// rather than a defaulted score.
    pub fn require_identity(&self, query: &str) -> Result<ResolvedIdentity> {
        let guard = self
            .resolver
            .read()
            .expect("identity mapping lock poisoned");
        guard
            .as_ref()
            .and_then(|resolver| resolver.lookup(query))
            .map(|(internal_id, raw_score, match_kind)| ResolvedIdentity {
                internal_id: internal_id.to_string(),
                raw_score,
                match_kind,
            })
            .ok_or_else(|| BridgeError::UnresolvedIdentity(query.to_string()))
    }

    /// Number of records in the current mapping, if any.
    pub fn mapped_records(&self) -> usize {
        self.resolver
            .read()
            .expect("identity mapping lock poisoned")
            .as_ref()
            .map(|r| r.record_count())
            .unwrap_or(0)
    }
}

impl Default for ScoreBridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}
