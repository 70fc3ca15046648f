//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "satprep")]
#[command(
    author,
    version,
    about = "Ingest SAT math PDFs and generate practice questions from them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every PDF under the root directory into the vector index
    Ingest(IngestArgs),

    /// Generate three practice questions for a topic
    Generate(GenerateArgs),

    /// Inspect or create the config file
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct IngestArgs {
    /// Directory to scan (overrides ROOT_DIRECTORY)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Question topic
    #[arg(long, default_value = "algebraic inequalities")]
    pub topic: String,

    /// Easy, moderate or hard
    #[arg(long, default_value = "moderate")]
    pub difficulty: String,

    /// English, Spanish, French, German or Other
    #[arg(long, default_value = "english")]
    pub language: String,

    /// Extra instructions for the model
    #[arg(long, default_value = "Please include more word problems.")]
    pub instructions: String,

    /// Also write the answer to this file (.md or .html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the retrieved reference chunks
    #[arg(long)]
    pub show_context: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with secrets masked
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
