//! opuscaf - lossless container repackaging between Ogg and CAF for OPUS audio
//!
//! Entry point for the opuscaf CLI.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use opuscaf::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::OggToCaf {
            input,
            output,
            delete_input,
            json,
        } => {
            commands::run_ogg_to_caf(&input, output, delete_input, json)?;
        }
        Commands::CafToOgg {
            input,
            output,
            delete_input,
            serial,
            vendor,
            json,
        } => {
            commands::run_caf_to_ogg(&input, output, delete_input, serial, vendor, json)?;
        }
        Commands::Completions { shell } => {
            opuscaf::cli::completions::print(shell);
        }
    }

    Ok(())
}
