pub mod board;
pub mod config;
pub mod load_config;
pub mod publish;
pub mod scan;
pub mod throttle;
pub mod trello;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::watch;

use load_config::load_config;
use publish::publish;
use trello::TrelloClient;

#[derive(Parser)]
#[clap(
    name = "card-courier",
    version,
    about = "File local plain-text notes as cards on a Trello board"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the inbox directory and file every text note as a card
    Publish {
        /// Inbox directory to scan, overriding INBOX_DIR
        #[clap(long)]
        dir: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli, shutdown: watch::Receiver<bool>) -> Result<()> {
    match cli.command {
        Commands::Publish { dir } => {
            let mut config = load_config()?;
            if let Some(dir) = dir {
                config.inbox.root = dir;
            }
            config.trace_loaded();

            let client = Arc::new(TrelloClient::new(
                config.board.api_key.clone(),
                config.board.api_token.clone(),
            ));

            let started = Instant::now();
            println!("Publishing notes from {}...", config.inbox.root.display());

            let report = publish(&config, client, shutdown).await?;

            println!("Total files processed: {}", report.eligible);
            println!(
                "Created: {}, failed: {}, cancelled: {}",
                report.created.len(),
                report.failed.len(),
                report.cancelled
            );
            println!("Execution time: {:?}", started.elapsed());
            Ok(())
        }
    }
}
