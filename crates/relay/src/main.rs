//! relay - Entry Point
//!
//! Binary entry point for the relay command line tool.

// Force-link relay-providers to ensure linkme registrations are included
extern crate relay_providers;

use clap::Parser;
use relay::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
