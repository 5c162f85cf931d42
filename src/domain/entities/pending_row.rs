use serde::{Deserialize, Serialize};

/// Identifier value the upstream lookup writes when it found no product.
pub const NO_RESULT_SENTINEL: &str = "No Results";

/// A data-sheet row waiting to be enriched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRow {
    /// 1-based sheet row.
    pub row: u32,
    pub identifier: String,
    pub url: String,
}

impl PendingRow {
    pub fn new(row: u32, identifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            row,
            identifier: identifier.into(),
            url: url.into(),
        }
    }

    pub fn is_no_result(&self) -> bool {
        self.identifier == NO_RESULT_SENTINEL
    }
}
