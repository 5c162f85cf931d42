pub mod metrics_row;
pub mod pending_row;
pub mod product_record;
pub mod profitability;
pub mod retail_snapshot;
