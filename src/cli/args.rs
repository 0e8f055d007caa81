//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// opuscaf - lossless container repackaging between Ogg and CAF for OPUS audio
#[derive(Parser, Debug)]
#[command(name = "opuscaf")]
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
    /// Convert an Ogg-OPUS file to CAF
    OggToCaf {
        /// Input .ogg file
        input: PathBuf,

        /// Output .caf file (defaults to the input with its extension swapped)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delete the input file after a successful conversion
        #[arg(long)]
        delete_input: bool,

        /// Print a machine-readable summary to stdout instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Convert a CAF file to Ogg-OPUS
    CafToOgg {
        /// Input .caf file
        input: PathBuf,

        /// Output .ogg file (defaults to the input with its extension swapped)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delete the input file after a successful conversion
        #[arg(long)]
        delete_input: bool,

        /// Inject a fixed Ogg serial number instead of deriving one from
        /// wall-clock time (for reproducible output)
        #[arg(long)]
        serial: Option<u32>,

        /// OpusTags vendor string to write
        #[arg(long, default_value = "opuscaf")]
        vendor: String,

        /// Print a machine-readable summary to stdout instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
