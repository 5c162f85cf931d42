pub mod cell_ref;
pub mod money;
pub mod price_stats;
pub mod run_params;
