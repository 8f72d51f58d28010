//! Sigchain CLI: sign a batch of integers and print the fingerprint.

use anyhow::Result;
use clap::Parser;
use sigchain::engine::arg_parser::Cli;
use sigchain::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
