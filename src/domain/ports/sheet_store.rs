use crate::domain::error::DomainError;
use crate::domain::values::cell_ref::CellRef;

/// Sheet holding run parameters and credentials.
pub const SETUP_SHEET: &str = "Setup";
/// Sheet holding identifiers, URLs, outputs and the cursor.
pub const DATA_SHEET: &str = "OALive";

/// A tabular store of named sheets with string cells.
///
/// Every cell is optional text; callers parse what they need. Writes replace
/// whatever was in the cell, so replaying a write is harmless.
pub trait SheetStore: Send + Sync {
    fn get_cell(&self, sheet: &str, cell: CellRef) -> Result<Option<String>, DomainError>;

    fn set_cell(&self, sheet: &str, cell: CellRef, value: &str) -> Result<(), DomainError>;

    fn clear_cell(&self, sheet: &str, cell: CellRef) -> Result<(), DomainError>;

    /// Write several cells of one row atomically.
    fn set_row_cells(
        &self,
        sheet: &str,
        row: u32,
        cells: &[(u32, String)],
    ) -> Result<(), DomainError>;

    /// A rectangular block, `rows` x `cols`, starting at `first`. Missing
    /// cells come back as `None`.
    fn get_range(
        &self,
        sheet: &str,
        first: CellRef,
        rows: u32,
        cols: u32,
    ) -> Result<Vec<Vec<Option<String>>>, DomainError>;

    /// Highest row holding any value, 0 for an empty sheet.
    fn last_row(&self, sheet: &str) -> Result<u32, DomainError>;

    /// First row whose cell in `col` equals `value`.
    fn find_row(&self, sheet: &str, col: u32, value: &str) -> Result<Option<u32>, DomainError>;

    /// Column A / column B pairs for every row that has a key in column A.
    fn key_values(&self, sheet: &str) -> Result<Vec<(String, String)>, DomainError>;
}
