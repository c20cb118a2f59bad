//! Ledger-Lens command-line entry point.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ledger_runtime::{Args, HttpBlobStore, JsonRpcLedgerClient, LedgerRuntime};
use shared_types::LedgerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Arc::new(LedgerConfig::from_env());
    info!(
        "Ledger-Lens v{} (rpc: {}, storage: {})",
        env!("CARGO_PKG_VERSION"),
        config.rpc_url,
        config.storage_url
    );

    let ledger = Arc::new(JsonRpcLedgerClient::new(&config).context("building ledger client")?);
    let store = HttpBlobStore::new(&config).context("building blob store client")?;
    let runtime = LedgerRuntime::new(config, ledger, store);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runtime.execute(args.command, &mut out).await?;
    out.flush().context("flushing stdout")?;
    Ok(())
}
