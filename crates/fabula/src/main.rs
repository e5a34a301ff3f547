//! Fabula CLI binary.
//!
//! Generates a complete book from keywords:
//! - Loads configuration from files, environment and flags
//! - Runs the staged pipeline against Gemini
//! - Writes each stage and the growing book to the output directory

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_generate};

    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    fabula::init_logging(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Generate(args) => {
            run_generate(args).await?;
        }
    }

    Ok(())
}
