pub mod migrations;
pub mod sheet_store;
