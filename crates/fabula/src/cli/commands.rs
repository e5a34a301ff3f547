//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use fabula::{ConfigOverrides, ContextMode};
use std::path::PathBuf;

/// Fabula - generate a novel from a handful of keywords
#[derive(Parser, Debug)]
#[command(name = "fabula")]
#[command(about = "Generate a novel from a handful of keywords", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a book
    Generate(GenerateArgs),
}

/// Flags for `fabula generate`; each overrides the loaded configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Thematic keywords, e.g. "desert, exile, prophecy"
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Target number of chapters
    #[arg(short, long)]
    pub chapters: Option<u32>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory for generated files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop if the book has not ended after this many paragraphs
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Suggested paragraphs per chapter
    #[arg(long)]
    pub paragraphs_per_chapter: Option<u32>,

    /// Send the whole book with every paragraph prompt instead of a summary
    #[arg(long)]
    pub full_context: bool,
}

impl From<GenerateArgs> for ConfigOverrides {
    fn from(args: GenerateArgs) -> Self {
        Self {
            keywords: args.keywords,
            chapter_count: args.chapters,
            model: args.model,
            output_dir: args.output,
            max_iterations: args.max_iterations,
            paragraphs_per_chapter: args.paragraphs_per_chapter,
            context_mode: args.full_context.then_some(ContextMode::Full),
        }
    }
}
