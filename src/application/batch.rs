//! One pass over a bounded slice of pending data-sheet rows.
//!
//! Rows are independent: a provider failure or a product with no data only
//! affects its own row, and is recorded in the [`BatchReport`]. Only store
//! (database) failures abort the run.

use crate::application::cursor::CursorUseCase;
use crate::application::extract::{extract_metrics, select_record};
use crate::application::output::{product_cells, result_cells};
use crate::application::profitability::evaluate;
use crate::domain::entities::pending_row::PendingRow;
use crate::domain::entities::retail_snapshot::RetailSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::price_data::PriceDataSource;
use crate::domain::ports::retail_page::RetailPageSource;
use crate::domain::ports::sheet_store::{SheetStore, DATA_SHEET};
use crate::domain::values::cell_ref::CellRef;
use crate::domain::values::run_params::RunParameters;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

pub const DEFAULT_BATCH_SIZE: u32 = 60;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub batch_size: u32,
    /// Write the advanced cursor back once the batch is done.
    pub advance_cursor: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            advance_cursor: true,
        }
    }
}

/// What happened to a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOutcome {
    /// Every output column written.
    Written,
    /// Retail page unavailable; only product-derived columns written.
    ProductOnly,
    /// Identifier was the "no result" sentinel.
    NoResult,
    /// Blank identifier cell.
    Blank,
    /// Provider had no record for the identifier.
    NoData,
    /// Provider call failed; nothing written.
    Failed,
}

#[derive(Debug, Serialize)]
pub struct RowReport {
    pub row: u32,
    pub identifier: String,
    pub outcome: RowOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub cursor_before: u32,
    pub cursor_after: u32,
    pub cursor_persisted: bool,
    pub rows: Vec<RowReport>,
    pub tokens_left: Option<i64>,
}

impl BatchReport {
    pub fn count(&self, outcome: RowOutcome) -> usize {
        self.rows.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn is_noop(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct BatchRunner {
    store: Arc<dyn SheetStore>,
    price_data: Arc<dyn PriceDataSource>,
    retail: Arc<dyn RetailPageSource>,
    cursor: CursorUseCase,
}

impl BatchRunner {
    pub fn new(
        store: Arc<dyn SheetStore>,
        price_data: Arc<dyn PriceDataSource>,
        retail: Arc<dyn RetailPageSource>,
    ) -> Self {
        Self {
            cursor: CursorUseCase::new(store.clone()),
            store,
            price_data,
            retail,
        }
    }

    pub async fn execute(
        &self,
        params: &RunParameters,
        options: &BatchOptions,
    ) -> Result<BatchReport, DomainError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("batch", run_id = %run_id);
        self.run(run_id, params, options).instrument(span).await
    }

    async fn run(
        &self,
        run_id: String,
        params: &RunParameters,
        options: &BatchOptions,
    ) -> Result<BatchReport, DomainError> {
        let cursor_before = self.cursor.read()?;
        let batch = self.pending_rows(cursor_before, options.batch_size)?;

        let mut report = BatchReport {
            run_id,
            cursor_before,
            cursor_after: cursor_before,
            cursor_persisted: false,
            rows: Vec::with_capacity(batch.len()),
            tokens_left: None,
        };

        if batch.is_empty() {
            info!("No data left to process");
            return Ok(report);
        }

        info!(
            rows = batch.len(),
            first_row = cursor_before + 1,
            "Processing batch"
        );

        for pending in &batch {
            let (outcome, error) = match self.process_row(pending, params, &mut report).await {
                Ok(outcome) => (outcome, None),
                Err(e @ DomainError::Database(_)) => return Err(e),
                Err(e) => {
                    warn!(row = pending.row, identifier = %pending.identifier, error = %e, "Row failed");
                    (RowOutcome::Failed, Some(e.to_string()))
                }
            };
            report.rows.push(RowReport {
                row: pending.row,
                identifier: pending.identifier.clone(),
                outcome,
                error,
            });
        }

        report.cursor_after = cursor_before + batch.len() as u32;
        if options.advance_cursor {
            self.cursor.persist(report.cursor_after)?;
            report.cursor_persisted = true;
        }
        info!(
            cursor = report.cursor_after,
            persisted = report.cursor_persisted,
            written = report.count(RowOutcome::Written),
            "Batch complete"
        );

        Ok(report)
    }

    /// Up to `limit` rows after `cursor`, identifiers in column A and URLs in column B.
    pub fn pending_rows(&self, cursor: u32, limit: u32) -> Result<Vec<PendingRow>, DomainError> {
        let last_row = self.store.last_row(DATA_SHEET)?;
        if last_row <= cursor || limit == 0 {
            return Ok(Vec::new());
        }
        let count = (last_row - cursor).min(limit);
        let first = cursor + 1;
        let cells = self
            .store
            .get_range(DATA_SHEET, CellRef::new(first, 1), count, 2)?;

        Ok(cells
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let mut cols = row.into_iter();
                let identifier = cols.next().flatten().unwrap_or_default();
                let url = cols.next().flatten().unwrap_or_default();
                PendingRow::new(first + i as u32, identifier.trim(), url.trim())
            })
            .collect())
    }

    async fn process_row(
        &self,
        pending: &PendingRow,
        params: &RunParameters,
        report: &mut BatchReport,
    ) -> Result<RowOutcome, DomainError> {
        if pending.is_no_result() {
            info!(row = pending.row, "Skipping 'No Results' entry");
            return Ok(RowOutcome::NoResult);
        }
        if pending.identifier.is_empty() {
            debug!(row = pending.row, "Skipping blank identifier");
            return Ok(RowOutcome::Blank);
        }

        let records = self
            .price_data
            .fetch_products(std::slice::from_ref(&pending.identifier), params.domain_id)
            .await?;
        let Some(metrics) = extract_metrics(select_record(&records, &pending.identifier)) else {
            info!(row = pending.row, identifier = %pending.identifier, "No product data");
            return Ok(RowOutcome::NoData);
        };

        match self.price_data.tokens_left().await {
            Ok(tokens) => {
                info!(tokens_left = tokens, provider = self.price_data.name(), "Quota");
                report.tokens_left = Some(tokens);
            }
            Err(e) => warn!(error = %e, "Could not read remaining quota"),
        }

        let snapshot = if pending.url.is_empty() {
            warn!(row = pending.row, "No retail URL");
            None
        } else {
            self.fetch_snapshot(pending).await
        };
        let (cells, outcome) = match snapshot {
            Some(snapshot) => {
                let result = evaluate(&metrics, &snapshot, params, chrono::Local::now());
                debug!(
                    row = pending.row,
                    profit = result.profit,
                    purchase = result.purchase_recommended,
                    "Evaluated"
                );
                (result_cells(&metrics, &result), RowOutcome::Written)
            }
            None => (product_cells(&metrics), RowOutcome::ProductOnly),
        };

        self.store.set_row_cells(DATA_SHEET, pending.row, &cells)?;
        info!(row = pending.row, outcome = ?outcome, "Wrote entry");
        Ok(outcome)
    }

    /// Retail failures degrade the row instead of failing it.
    async fn fetch_snapshot(&self, pending: &PendingRow) -> Option<RetailSnapshot> {
        match self.retail.fetch_snapshot(&pending.url).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    row = pending.row,
                    url = %pending.url,
                    provider = self.retail.name(),
                    error = %e,
                    "Retail page fetch failed"
                );
                None
            }
        }
    }
}
