//! # Blokka Node Runtime
//!
//! Runs a small ledger network in one process.
//!
//! ## Startup Sequence
//!
//! 1. Install the log subscriber (`RUST_LOG` filters, default `info`)
//! 2. Load configuration from the environment
//! 3. Open the file chain store under the data directory
//! 4. Spawn one node per id and peer them as a full mesh
//! 5. Submit transactions read from stdin, round-robin
//! 6. On end of input or Ctrl+C, log chain lengths and stop the nodes

use std::sync::Arc;

use anyhow::{Context, Result};
use bk_01_chain_storage::FileChainBackend;
use node_runtime::{load_config, parse_line, NodeRuntime};
use shared_types::Timestamp;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Blokka Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = load_config();
    config.validate().context("Invalid runtime configuration")?;

    let backend = FileChainBackend::from_config(&config.storage)
        .context("Failed to open chain storage")?;
    let mut runtime = NodeRuntime::start(&config, Arc::new(backend))
        .await
        .context("Failed to start nodes")?;

    info!("Reading transactions from stdin, one JSON object per line. Press Ctrl+C to stop.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("End of input");
                    break;
                };
                match parse_line(&line, Timestamp::now()) {
                    Ok(Some(transaction)) => {
                        if let Err(e) = runtime.submit(transaction).await {
                            error!("Transaction rejected: {}", e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Skipping input line: {}", e),
                }
            }
            signal = &mut ctrl_c => {
                signal.context("Failed to listen for Ctrl+C")?;
                info!("Ctrl+C received");
                break;
            }
        }
    }

    runtime.shutdown().await.context("Shutdown failed")?;
    Ok(())
}
