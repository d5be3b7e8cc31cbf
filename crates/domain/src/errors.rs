//! Domain error type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised while assembling or validating configuration
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StudyLensError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for StudyLens domain operations
pub type Result<T> = std::result::Result<T, StudyLensError>;
