//! Domain types and models

pub mod analysis;
pub mod generation;

pub use analysis::PageAnalysis;
pub use generation::{GenerationKind, GenerationProfile, GenerationRequest};
