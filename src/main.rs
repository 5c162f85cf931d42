use buybox::application::batch::BatchOptions;
use buybox::application::rows::NewRow;
use buybox::cli::commands::{Cli, Commands};
use buybox::BuyBox;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = std::env::var("BUYBOX_DB").unwrap_or_else(|_| "./buybox.db".into());

    let bb = match BuyBox::new(&db_path) {
        Ok(bb) => bb,
        Err(e) => {
            eprintln!("Error opening {db_path}: {e}");
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Commands::Run {
        keep_cursor: false,
        batch_size: buybox::application::batch::DEFAULT_BATCH_SIZE,
    });

    if let Err(e) = run_command(bb, command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(bb: BuyBox, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Run {
            keep_cursor,
            batch_size,
        } => {
            let options = BatchOptions {
                batch_size,
                advance_cursor: !keep_cursor,
            };
            let report = bb.run(&options).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Status => {
            let status = bb.status()?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::SetCursor { row } => {
            bb.set_cursor(row)?;
            println!("Cursor set to {row}");
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let rows: Vec<NewRow> = serde_json::from_str(&raw)?;
            let written = bb.import_rows(&rows)?;
            match (written.first(), written.last()) {
                (Some(first), Some(last)) => {
                    println!("Imported {} rows ({first}..={last})", written.len())
                }
                _ => println!("Nothing to import"),
            }
        }
        Commands::Export => {
            let rows = bb.export_rows()?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Setup { key, value } => {
            bb.set_setup(&key, &value)?;
            println!("Setup {key} updated");
        }
        Commands::Tokens => {
            let tokens = bb.tokens_left().await?;
            println!("{tokens}");
        }
    }
    Ok(())
}
