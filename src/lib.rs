pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::batch::{BatchOptions, BatchReport, BatchRunner};
use crate::application::cursor::{CursorStatus, CursorUseCase};
use crate::application::rows::{ExportedRow, NewRow, RowsUseCase};
use crate::application::setup::SetupUseCase;
use crate::domain::error::DomainError;
use crate::domain::ports::price_data::PriceDataSource;
use crate::domain::ports::retail_page::RetailPageSource;
use crate::domain::ports::sheet_store::SheetStore;
use crate::domain::values::run_params::{Credentials, RunParameters};
use crate::infrastructure::providers::keepa::KeepaClient;
use crate::infrastructure::providers::oxylabs::OxylabsClient;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::sheet_store::SqliteSheetStore;
use rusqlite::Connection;
use std::sync::Arc;

pub struct BuyBox {
    store: Arc<dyn SheetStore>,
    setup_uc: SetupUseCase,
    cursor_uc: CursorUseCase,
    rows_uc: RowsUseCase,
}

impl BuyBox {
    /// Open (or create) the SQLite-backed sheet store at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;
        Ok(Self::with_store(Arc::new(SqliteSheetStore::new(conn))))
    }

    pub fn with_store(store: Arc<dyn SheetStore>) -> Self {
        Self {
            setup_uc: SetupUseCase::new(store.clone()),
            cursor_uc: CursorUseCase::new(store.clone()),
            rows_uc: RowsUseCase::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> Arc<dyn SheetStore> {
        self.store.clone()
    }

    pub fn run_parameters(&self) -> Result<RunParameters, DomainError> {
        self.setup_uc.run_parameters()
    }

    pub fn credentials(&self) -> Result<Credentials, DomainError> {
        self.setup_uc.credentials()
    }

    /// Run one batch against the live providers configured in the setup sheet.
    pub async fn run(&self, options: &BatchOptions) -> Result<BatchReport, DomainError> {
        let creds = self.credentials()?;
        let price_data: Arc<dyn PriceDataSource> = Arc::new(KeepaClient::new(&creds.keepa_api_key)?);
        let retail: Arc<dyn RetailPageSource> = if creds.api_url.trim().is_empty() {
            Arc::new(OxylabsClient::new(&creds.username, &creds.password)?)
        } else {
            Arc::new(OxylabsClient::with_endpoint(
                &creds.username,
                &creds.password,
                creds.api_url.trim(),
            )?)
        };
        self.run_with_providers(price_data, retail, options).await
    }

    /// Run one batch against the given providers.
    pub async fn run_with_providers(
        &self,
        price_data: Arc<dyn PriceDataSource>,
        retail: Arc<dyn RetailPageSource>,
        options: &BatchOptions,
    ) -> Result<BatchReport, DomainError> {
        let params = self.run_parameters()?;
        BatchRunner::new(self.store.clone(), price_data, retail)
            .execute(&params, options)
            .await
    }

    pub async fn tokens_left(&self) -> Result<i64, DomainError> {
        let creds = self.credentials()?;
        KeepaClient::new(&creds.keepa_api_key)?.tokens_left().await
    }

    pub fn status(&self) -> Result<CursorStatus, DomainError> {
        self.cursor_uc.status()
    }

    pub fn set_cursor(&self, cursor: u32) -> Result<(), DomainError> {
        self.cursor_uc.persist(cursor)
    }

    pub fn set_setup(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.setup_uc.set(key, value)
    }

    pub fn import_rows(&self, rows: &[NewRow]) -> Result<Vec<u32>, DomainError> {
        self.rows_uc.import(rows)
    }

    pub fn export_rows(&self) -> Result<Vec<ExportedRow>, DomainError> {
        self.rows_uc.export()
    }
}
