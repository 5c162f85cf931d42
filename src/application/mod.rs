pub mod batch;
pub mod cursor;
pub mod extract;
pub mod output;
pub mod profitability;
pub mod rows;
pub mod setup;
