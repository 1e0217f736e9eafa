//! # Consolidator Score Bridge
//!
//! Reconciles the vector similarity search collaborator with the internal
//! confidence domain. Two concerns, two stages:
//!
//! 1. **Identity resolution**: the search service names records by its own
//!    identifiers (point ids, source paths, titles, any casing). The
//!    resolver maps those onto internal file identifiers with exact,
//!    normalized, and fuzzy matching.
//! 2. **Score normalization**: raw similarity scores live in an open-ended
//!    empirical range; the normalizer rescales them into the 0–100
//!    confidence domain using a calibrated range.
//!
//! [`ScoreBridge`] ties both together behind a lookup that degrades to a
//! zero default instead of failing: one unmapped record must never abort
//! a batch.

mod bridge;
mod config;
mod error;
mod normalizer;
mod resolver;
mod types;

pub use bridge::ScoreBridge;
pub use config::{BridgeConfig, CalibrationRange};
pub use error::{BridgeError, Result};
pub use normalizer::normalize;
pub use resolver::IdentityResolver;
pub use types::{MatchKind, Method, NormalizedConfidence, ResolvedIdentity};
