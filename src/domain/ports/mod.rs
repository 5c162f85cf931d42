pub mod price_data;
pub mod retail_page;
pub mod sheet_store;
