//! # StudyLens Domain
//!
//! Business domain types for StudyLens.
//!
//! This crate contains:
//! - Configuration structures for the identity, recognition and generation
//!   endpoints
//! - Generation kinds and their fixed prompt profiles
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other StudyLens crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
