//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// slidecraft - Turn a topic into a PowerPoint deck
#[derive(Parser, Debug)]
#[command(name = "slidecraft")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the web, draft slides with an LLM and write a deck
    Generate {
        /// Topic of the deck (prompted for when omitted)
        topic: Option<String>,

        /// Output file path (defaults to <topic>_slides.pptx in deck.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of slides to ask for
        #[arg(short = 'n', long)]
        slides: Option<usize>,
    },

    /// Build a deck from previously generated slide text
    Build {
        /// Text file with blank-line separated slides
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to <title>_slides.pptx in deck.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Deck title (defaults to the input file name)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Check API keys and provider settings
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
