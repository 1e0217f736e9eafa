//! # Consolidator Protocol
//!
//! Shared data model for the convergence and score-bridge crates:
//!
//! - [`AnalysisIteration`]: one analysis pass result for a file
//! - [`ExternalRecord`]: a raw record from the similarity search service
//! - [`CategoryProvider`]: read-only accessor for manually curated categories
//! - [`similarity`]: string-similarity primitives shared by the category
//!   scorers and the identity resolver
//!
//! Everything here is a plain value type or a pure function; the stateful
//! engines live in the downstream crates.

pub mod similarity;

mod store;
mod types;

pub use store::{CategoryProvider, StaticCategories};
pub use types::{AnalysisHistory, AnalysisIteration, ExternalRecord};
