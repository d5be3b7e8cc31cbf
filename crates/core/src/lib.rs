//! # StudyLens Core
//!
//! Business sequencing layer - no HTTP code.
//!
//! This crate contains:
//! - Port interfaces for text recognition and text generation
//! - [`TutorService`], which sequences "recognize then generate" for one
//!   page and records stage events
//!
//! ## Architecture Principles
//! - Depends only on `studylens-common` and `studylens-domain`
//! - Remote APIs are reached through the ports, implemented in
//!   `studylens-infra`

pub mod tutor;

pub use tutor::ports::{TextGenerator, TextRecognizer};
pub use tutor::TutorService;
