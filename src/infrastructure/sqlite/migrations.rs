use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cells (
            sheet TEXT NOT NULL,
            row INTEGER NOT NULL,
            col INTEGER NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (sheet, row, col)
        );

        CREATE INDEX IF NOT EXISTS idx_cells_sheet_col ON cells(sheet, col);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
