//! Setup-sheet configuration: run parameters and provider credentials.

use crate::domain::error::DomainError;
use crate::domain::ports::sheet_store::{SheetStore, SETUP_SHEET};
use crate::domain::values::cell_ref::CellRef;
use crate::domain::values::run_params::{parse_domain_id, Credentials, RunParameters};
use std::sync::Arc;

pub const REGION_CELL: CellRef = CellRef { row: 1, col: 1 };
pub const PREP_FEE_CELL: CellRef = CellRef { row: 8, col: 2 };
pub const WEIGHT_FACTOR_CELL: CellRef = CellRef { row: 9, col: 2 };
pub const EXCHANGE_RATE_CELL: CellRef = CellRef { row: 10, col: 2 };

pub const KEY_API_URL: &str = "apiUrl";
pub const KEY_USERNAME: &str = "username";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_KEEPA_API_KEY: &str = "keepaApiKey";

const CREDENTIAL_KEYS: [&str; 4] = [KEY_API_URL, KEY_USERNAME, KEY_PASSWORD, KEY_KEEPA_API_KEY];

pub struct SetupUseCase {
    store: Arc<dyn SheetStore>,
}

impl SetupUseCase {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    pub fn run_parameters(&self) -> Result<RunParameters, DomainError> {
        let region = self.required_cell(REGION_CELL)?;
        let domain_id = parse_domain_id(&region).ok_or_else(|| {
            DomainError::Config(format!(
                "{SETUP_SHEET}!{REGION_CELL} has no domain id: {region:?}"
            ))
        })?;

        Ok(RunParameters {
            domain_id,
            exchange_rate: self.number(EXCHANGE_RATE_CELL)?,
            weight_fee_factor: self.number(WEIGHT_FACTOR_CELL)?,
            prep_fee: self.number(PREP_FEE_CELL)?,
        })
    }

    /// Credentials from the key/value rows. Only the price-data key is
    /// mandatory; the retail provider may run without basic auth.
    pub fn credentials(&self) -> Result<Credentials, DomainError> {
        let mut creds = Credentials::default();
        for (key, value) in self.store.key_values(SETUP_SHEET)? {
            match key.as_str() {
                KEY_API_URL => creds.api_url = value,
                KEY_USERNAME => creds.username = value,
                KEY_PASSWORD => creds.password = value,
                KEY_KEEPA_API_KEY => creds.keepa_api_key = value,
                _ => {}
            }
        }
        if creds.keepa_api_key.trim().is_empty() {
            return Err(DomainError::Config(format!(
                "{KEY_KEEPA_API_KEY} missing from {SETUP_SHEET} sheet"
            )));
        }
        Ok(creds)
    }

    /// Write a setup value. `key` is either a cell address in upper case
    /// (`B10`), where an empty value clears the cell, or a key whose row is
    /// updated or appended.
    pub fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let key = key.trim();
        if let Some(cell) = setup_cell(key) {
            return if value.trim().is_empty() {
                self.store.clear_cell(SETUP_SHEET, cell)
            } else {
                self.store.set_cell(SETUP_SHEET, cell, value)
            };
        }

        let row = match self.store.find_row(SETUP_SHEET, 1, key)? {
            Some(row) => row,
            None => self
                .store
                .last_row(SETUP_SHEET)?
                .checked_add(1)
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!("{SETUP_SHEET} sheet has no free row for {key}"))
                })?,
        };
        self.store
            .set_row_cells(SETUP_SHEET, row, &[(1, key.to_string()), (2, value.to_string())])
    }

    fn required_cell(&self, cell: CellRef) -> Result<String, DomainError> {
        self.store
            .get_cell(SETUP_SHEET, cell)?
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| DomainError::Config(format!("{SETUP_SHEET}!{cell} is empty")))
    }

    fn number(&self, cell: CellRef) -> Result<f64, DomainError> {
        let raw = self.required_cell(cell)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                DomainError::Config(format!("{SETUP_SHEET}!{cell} is not a number: {raw:?}"))
            })
    }
}

/// Upper-case A1 addresses name cells; anything else, including the
/// credential keys and lower-case keys like `key1`, is a key/value row.
fn setup_cell(key: &str) -> Option<CellRef> {
    if CREDENTIAL_KEYS.contains(&key) {
        return None;
    }
    if !key
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .all(|c| c.is_ascii_uppercase())
    {
        return None;
    }
    CellRef::parse(key).ok()
}
