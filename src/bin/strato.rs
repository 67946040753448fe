// src/bin/strato.rs

//! Entry point for the Strato CLI client.

use anyhow::Result;
use clap::Parser;
use strato::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args).await
}
