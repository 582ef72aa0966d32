//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atelier - moderation-gated AI image generation.
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(about = "Generate images from text prompts behind a two-layer moderation gate", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Moderate a prompt and generate an image from it
    Generate {
        /// Text prompt describing the image
        prompt: String,

        /// Where to write the PNG
        #[arg(short, long, default_value = "immagine_generata.png")]
        output: PathBuf,

        /// Log the generation, attributed to these people
        #[arg(short, long)]
        group_members: Option<String>,
    },

    /// Run only the moderation layers on a prompt
    Check {
        /// Text prompt to check
        prompt: String,
    },

    /// List logged generations, newest last
    History {
        /// Show only the last N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
