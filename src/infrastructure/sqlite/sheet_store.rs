use crate::domain::error::DomainError;
use crate::domain::ports::sheet_store::SheetStore;
use crate::domain::values::cell_ref::CellRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::Mutex;

/// Spreadsheet-shaped store on SQLite: one row per non-empty cell.
pub struct SqliteSheetStore {
    conn: Mutex<Connection>,
}

impl SqliteSheetStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

const UPSERT_CELL: &str = "INSERT INTO cells (sheet, row, col, value, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(sheet, row, col) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

impl SheetStore for SqliteSheetStore {
    fn get_cell(&self, sheet: &str, cell: CellRef) -> Result<Option<String>, DomainError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM cells WHERE sheet = ?1 AND row = ?2 AND col = ?3",
            params![sheet, cell.row, cell.col],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DomainError::Database(format!("Failed to read {sheet}!{cell}: {e}")))
    }

    fn set_cell(&self, sheet: &str, cell: CellRef, value: &str) -> Result<(), DomainError> {
        let conn = self.lock()?;
        conn.execute(
            UPSERT_CELL,
            params![sheet, cell.row, cell.col, value, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| DomainError::Database(format!("Failed to write {sheet}!{cell}: {e}")))?;
        Ok(())
    }

    fn clear_cell(&self, sheet: &str, cell: CellRef) -> Result<(), DomainError> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM cells WHERE sheet = ?1 AND row = ?2 AND col = ?3",
            params![sheet, cell.row, cell.col],
        )
        .map_err(|e| DomainError::Database(format!("Failed to clear {sheet}!{cell}: {e}")))?;
        Ok(())
    }

    fn set_row_cells(
        &self,
        sheet: &str,
        row: u32,
        cells: &[(u32, String)],
    ) -> Result<(), DomainError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = chrono::Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare_cached(UPSERT_CELL)?;
            for (col, value) in cells {
                stmt.execute(params![sheet, row, col, value, now])
                    .map_err(|e| {
                        DomainError::Database(format!("Failed to write {sheet} row {row}: {e}"))
                    })?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_range(
        &self,
        sheet: &str,
        first: CellRef,
        rows: u32,
        cols: u32,
    ) -> Result<Vec<Vec<Option<String>>>, DomainError> {
        if rows == 0 || cols == 0 {
            return Ok(Vec::new());
        }
        let last_row = first.row + rows - 1;
        let last_col = first.col + cols - 1;

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT row, col, value FROM cells
             WHERE sheet = ?1 AND row BETWEEN ?2 AND ?3 AND col BETWEEN ?4 AND ?5",
        )?;
        let found: HashMap<(u32, u32), String> = stmt
            .query_map(
                params![sheet, first.row, last_row, first.col, last_col],
                |row| Ok(((row.get(0)?, row.get(1)?), row.get(2)?)),
            )?
            .collect::<Result<_, _>>()?;

        Ok((first.row..=last_row)
            .map(|r| {
                (first.col..=last_col)
                    .map(|c| found.get(&(r, c)).cloned())
                    .collect()
            })
            .collect())
    }

    fn last_row(&self, sheet: &str) -> Result<u32, DomainError> {
        let conn = self.lock()?;
        let max: Option<u32> = conn.query_row(
            "SELECT MAX(row) FROM cells WHERE sheet = ?1",
            params![sheet],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    fn find_row(&self, sheet: &str, col: u32, value: &str) -> Result<Option<u32>, DomainError> {
        let conn = self.lock()?;
        let row: Option<u32> = conn.query_row(
            "SELECT MIN(row) FROM cells WHERE sheet = ?1 AND col = ?2 AND value = ?3",
            params![sheet, col, value],
            |row| row.get(0),
        )?;
        Ok(row)
    }

    fn key_values(&self, sheet: &str) -> Result<Vec<(String, String)>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT k.value, COALESCE(v.value, '') FROM cells k
             LEFT JOIN cells v ON v.sheet = k.sheet AND v.row = k.row AND v.col = 2
             WHERE k.sheet = ?1 AND k.col = 1
             ORDER BY k.row",
        )?;
        let pairs = stmt
            .query_map(params![sheet], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, String)>, _>>()?;
        Ok(pairs)
    }
}
