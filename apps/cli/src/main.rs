//! Preprint Alert CLI: daily arXiv highlights, curated by a language model.
//!
//! Fetches the day's papers, lets the model pick and analyze the interesting
//! ones, stores the resulting article and rebuilds the static archive.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
