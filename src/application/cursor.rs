//! Batch cursor: the last processed data-sheet row, kept in `OALive!A1`.

use crate::domain::error::DomainError;
use crate::domain::ports::sheet_store::{SheetStore, DATA_SHEET};
use crate::domain::values::cell_ref::CellRef;
use serde::Serialize;
use std::sync::Arc;

pub const CURSOR_CELL: CellRef = CellRef { row: 1, col: 1 };
/// Header rows above the first data row; a blank cursor starts after them.
pub const DEFAULT_CURSOR: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorStatus {
    pub cursor: u32,
    pub last_row: u32,
    pub pending_rows: u32,
}

pub struct CursorUseCase {
    store: Arc<dyn SheetStore>,
}

impl CursorUseCase {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Blank, zero or non-numeric cursor cells fall back to [`DEFAULT_CURSOR`].
    pub fn read(&self) -> Result<u32, DomainError> {
        let raw = self.store.get_cell(DATA_SHEET, CURSOR_CELL)?;
        Ok(raw
            .and_then(|v| parse_cursor(&v))
            .filter(|c| *c > 0)
            .unwrap_or(DEFAULT_CURSOR))
    }

    pub fn persist(&self, cursor: u32) -> Result<(), DomainError> {
        self.store
            .set_cell(DATA_SHEET, CURSOR_CELL, &cursor.to_string())
    }

    pub fn status(&self) -> Result<CursorStatus, DomainError> {
        let cursor = self.read()?;
        let last_row = self.store.last_row(DATA_SHEET)?;
        Ok(CursorStatus {
            cursor,
            last_row,
            pending_rows: last_row.saturating_sub(cursor),
        })
    }
}

/// Leading integer of the cell, tolerating `"12.0"` and surrounding text.
fn parse_cursor(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
