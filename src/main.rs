use chrono::Utc;
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use transfer_sync::application::engine::TransferEngine;
use transfer_sync::application::scenario;
use transfer_sync::config::EngineConfig;
use transfer_sync::domain::ports::AccountStoreBox;
use transfer_sync::infrastructure::in_memory::InMemoryAccountStore;
use transfer_sync::interfaces::csv::account_reader::AccountReader;
use transfer_sync::interfaces::csv::account_writer::AccountWriter;
use transfer_sync::interfaces::csv::transfer_reader::TransferReader;
use transfer_sync::logging;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Transfer requests CSV file (from, to, amount). Runs the built-in demo if omitted.
    #[arg(requires = "accounts")]
    transfers: Option<PathBuf>,

    /// Accounts CSV file (account, first_name, last_name, credit_rating, balance)
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// How long a transfer waits for funds before its single retry
    #[arg(long, default_value_t = 3000)]
    retry_wait_ms: u64,

    /// Output format for the final account state
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = EngineConfig::with_retry_wait(Duration::from_millis(cli.retry_wait_ms));
    let store: AccountStoreBox = Box::new(InMemoryAccountStore::new());
    let engine = TransferEngine::new(store, config);

    let requests = match (cli.accounts, cli.transfers) {
        (Some(accounts), transfers) => {
            let registered_at = Utc::now();
            let file = File::open(accounts).into_diagnostic()?;
            for record in AccountReader::new(file).accounts() {
                match record {
                    Ok(record) => {
                        let holder = record.holder(registered_at);
                        if let Err(e) = engine
                            .open_account(record.account, holder, record.balance)
                            .await
                        {
                            error!("Error opening account: {}", e);
                        }
                    }
                    Err(e) => error!("Error reading account: {}", e),
                }
            }

            let mut requests = Vec::new();
            if let Some(transfers) = transfers {
                let file = File::open(transfers).into_diagnostic()?;
                for request in TransferReader::new(file).requests() {
                    match request {
                        Ok(request) => requests.push(request),
                        Err(e) => error!("Error reading transfer: {}", e),
                    }
                }
            }
            requests
        }
        (None, _) => {
            scenario::open_demo_accounts(&engine).await.into_diagnostic()?;
            scenario::demo_transfers()
        }
    };

    let reports = engine.run_all(requests).await.into_diagnostic()?;
    let completed = reports.iter().filter(|r| r.state.is_success()).count();
    info!(
        completed,
        cancelled = reports.len() - completed,
        "All transfers finished"
    );
    let snapshots = engine.snapshots().await.into_diagnostic()?;

    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => {
            let mut writer = AccountWriter::new(stdout.lock());
            writer.write_accounts(&snapshots).into_diagnostic()?;
        }
        OutputFormat::Json => {
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &snapshots).into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
    }

    Ok(())
}
