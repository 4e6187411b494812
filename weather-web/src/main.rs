//! Binary crate for the `weather` tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the city weather form over HTTP
//! - Interactive configuration

use clap::Parser;

mod cli;
mod page;
mod server;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
