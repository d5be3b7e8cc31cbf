//! Result of processing one uploaded page.

use serde::{Deserialize, Serialize};

/// Text extracted from a page image together with the generated explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub extracted_text: String,
    /// Empty when nothing was recognized and generation was skipped
    pub explanation: String,
}

impl PageAnalysis {
    pub fn has_text(&self) -> bool {
        !self.extracted_text.trim().is_empty()
    }
}
