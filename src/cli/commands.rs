use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "buybox",
    about = "Enrich marketplace listings with buy-box pricing and profitability analytics"
)]
pub struct Cli {
    /// Defaults to `run` so the binary can be scheduled without arguments.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process the next batch of pending rows
    Run {
        /// Leave the cursor where it is (re-running processes the same rows)
        #[arg(long)]
        keep_cursor: bool,
        /// Rows per batch
        #[arg(long, default_value = "60")]
        batch_size: u32,
    },
    /// Show cursor position and pending row count
    Status,
    /// Move the cursor to a row (the next batch starts after it)
    SetCursor {
        row: u32,
    },
    /// Append rows from a JSON file: [{"identifier": "...", "url": "..."}]
    Import {
        file: String,
    },
    /// Export data rows with their outputs as JSON
    Export,
    /// Write a setup value: a cell address (B10) or a credential key (keepaApiKey)
    Setup {
        key: String,
        value: String,
    },
    /// Show remaining price-data provider quota
    Tokens,
}
