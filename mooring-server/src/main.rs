//! mooring-server binary entry point.
//!
//! Setup steps below all return typed errors; this is the one place a
//! failure becomes a process exit code.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mooring_server::{run, ServerArgs};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; deployments set the environment directly.
    let _ = dotenvy::dotenv();

    init_tracing();

    let args = ServerArgs::parse();
    if let Err(err) = run(args).await {
        // {:#} renders the whole error chain on one line.
        tracing::error!("fatal: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
