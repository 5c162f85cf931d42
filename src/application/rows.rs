use crate::application::cursor::DEFAULT_CURSOR;
use crate::application::output::LAST_OUTPUT_COL;
use crate::domain::error::DomainError;
use crate::domain::ports::sheet_store::{SheetStore, DATA_SHEET};
use crate::domain::values::cell_ref::{column_letters, CellRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A row to append to the data sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRow {
    pub identifier: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ExportedRow {
    pub row: u32,
    pub identifier: String,
    pub url: String,
    /// Output cells keyed by column letter.
    pub outputs: BTreeMap<String, String>,
}

pub struct RowsUseCase {
    store: Arc<dyn SheetStore>,
}

impl RowsUseCase {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Append rows below the last used row, never inside the header rows.
    /// Returns the sheet rows written.
    pub fn import(&self, rows: &[NewRow]) -> Result<Vec<u32>, DomainError> {
        let mut next = self.store.last_row(DATA_SHEET)?.max(DEFAULT_CURSOR) + 1;
        let mut written = Vec::with_capacity(rows.len());
        for new_row in rows {
            let identifier = new_row.identifier.trim();
            if identifier.is_empty() {
                return Err(DomainError::InvalidInput(
                    "Row identifier must not be empty".into(),
                ));
            }
            self.store.set_row_cells(
                DATA_SHEET,
                next,
                &[(1, identifier.to_string()), (2, new_row.url.trim().to_string())],
            )?;
            written.push(next);
            next += 1;
        }
        Ok(written)
    }

    /// Every data row below the header rows, with whatever outputs it has.
    pub fn export(&self) -> Result<Vec<ExportedRow>, DomainError> {
        let last = self.store.last_row(DATA_SHEET)?;
        if last <= DEFAULT_CURSOR {
            return Ok(Vec::new());
        }
        let first = DEFAULT_CURSOR + 1;
        let grid = self.store.get_range(
            DATA_SHEET,
            CellRef::new(first, 1),
            last - DEFAULT_CURSOR,
            LAST_OUTPUT_COL,
        )?;

        Ok(grid
            .into_iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(Option::is_some))
            .map(|(i, cells)| {
                let mut cells = cells.into_iter();
                let identifier = cells.next().flatten().unwrap_or_default();
                let url = cells.next().flatten().unwrap_or_default();
                let outputs = cells
                    .enumerate()
                    .filter_map(|(j, v)| v.map(|v| (column_letters(j as u32 + 3), v)))
                    .collect();
                ExportedRow {
                    row: first + i as u32,
                    identifier,
                    url,
                    outputs,
                }
            })
            .collect())
    }
}
