//! # Consolidator Convergence
//!
//! Decides whether repeated analysis of a file has stabilized enough to be
//! trusted. Each analysis pass appends an iteration (confidence, label,
//! suggested categories); this crate turns the accumulated history into a
//! composite score and a convergence verdict.
//!
//! ## Pipeline
//!
//! ```text
//! AnalysisHistory
//!     │
//!     ├──> DerivedMetrics       (sort, variance, deltas, modal labels)
//!     │
//!     ├──> ComponentScores      (confidence, stability, type consistency,
//!     │                          category alignment, improvement: all [0,1])
//!     │
//!     └──> ConvergenceResult    (weighted composite + gate evaluation,
//!                                cached per history snapshot)
//! ```
//!
//! Every stage is a pure function; the only mutable state is the result
//! cache inside [`ConvergenceEngine`], which is safe to share across
//! threads.

mod cache;
mod config;
mod engine;
mod error;
mod judge;
mod metrics;
mod scorers;
mod weights;

pub use cache::{CacheStats, ConvergenceCache};
pub use config::ConvergenceConfig;
pub use engine::ConvergenceEngine;
pub use error::{ConvergenceError, Result};
pub use judge::{judge, ConvergenceResult};
pub use metrics::DerivedMetrics;
pub use scorers::{score_components, ComponentScores};
pub use weights::Weights;
