use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a directory of text files for one or more target languages
    Batch {
        /// Input directory containing source text files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Target languages (comma-separated)
        #[arg(short, long, default_value = "ta")]
        target_langs: String,

        /// Output root directory (one subdirectory per language)
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Split verse lines at the balanced syllable boundary
        #[arg(long)]
        do_splits: bool,

        /// Only transliterate lines ending in verse punctuation
        #[arg(long)]
        sentence_ends_only: bool,
    },

    /// Transliterate a single line of text and print the result
    Translate {
        /// Source-script text
        text: String,

        /// Target language
        #[arg(short, long, default_value = "ta")]
        target_lang: String,

        /// Split the line at the balanced syllable boundary
        #[arg(long)]
        do_splits: bool,
    },

    /// Apply content tweaks (header insertion, couplet collapsing) in place
    Tweak {
        /// Language directory to tweak
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Language of the directory
        #[arg(short, long)]
        lang: String,
    },

    /// Inspect the loaded sandhi rule table
    Rules {
        /// Restrict the merged view to these labels (comma-separated)
        #[arg(short, long)]
        labels: Option<String>,
    },

    /// Write the default configuration to a file
    Init {
        /// Destination path
        #[arg(short, long, default_value = "manjari.toml")]
        output: PathBuf,
    },
}
