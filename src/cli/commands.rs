//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConvertOptions;
use crate::convert::{caf_to_ogg, ogg_to_caf};

/// A machine-readable summary of a single conversion, printed with `--json`.
#[derive(Serialize)]
struct ConversionReport {
    input: String,
    output: String,
    input_bytes: usize,
    output_bytes: usize,
    deleted_input: bool,
}

fn print_report(report: &ConversionReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => tracing::warn!("failed to serialize conversion report: {err}"),
        }
    } else {
        tracing::info!(
            "Converted {} -> {} ({} bytes)",
            report.input,
            report.output,
            report.output_bytes
        );
    }
}

/// Derive the default output path by swapping the input's extension.
fn default_output_path(input: &Path, new_extension: &str) -> PathBuf {
    input.with_extension(new_extension)
}

/// Convert `input` (Ogg) to CAF, writing the result to `output` (or a
/// derived default path), optionally deleting `input` on success.
pub fn run_ogg_to_caf(
    input: &Path,
    output: Option<PathBuf>,
    delete_input: bool,
    json: bool,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output_path(input, "caf"));

    let input_bytes = fs::read(input)
        .with_context(|| format!("Failed to read Ogg file: {}", input.display()))?;

    let caf_bytes = ogg_to_caf(&input_bytes)
        .with_context(|| format!("Failed to convert {} to CAF", input.display()))?;

    fs::write(&output, &caf_bytes)
        .with_context(|| format!("Failed to write CAF file: {}", output.display()))?;

    let mut deleted_input = false;
    if delete_input {
        fs::remove_file(input)
            .with_context(|| format!("Failed to delete input file: {}", input.display()))?;
        tracing::info!("Deleted input file: {}", input.display());
        deleted_input = true;
    }

    print_report(
        &ConversionReport {
            input: input.display().to_string(),
            output: output.display().to_string(),
            input_bytes: input_bytes.len(),
            output_bytes: caf_bytes.len(),
            deleted_input,
        },
        json,
    );

    Ok(())
}

/// Convert `input` (CAF) to Ogg-OPUS, writing the result to `output` (or a
/// derived default path), optionally deleting `input` on success.
pub fn run_caf_to_ogg(
    input: &Path,
    output: Option<PathBuf>,
    delete_input: bool,
    serial: Option<u32>,
    vendor: String,
    json: bool,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output_path(input, "ogg"));

    let input_bytes = fs::read(input)
        .with_context(|| format!("Failed to read CAF file: {}", input.display()))?;

    let options = ConvertOptions {
        serial,
        vendor,
        ..ConvertOptions::default()
    };

    let ogg_bytes = caf_to_ogg(&input_bytes, &options)
        .with_context(|| format!("Failed to convert {} to Ogg", input.display()))?;

    fs::write(&output, &ogg_bytes)
        .with_context(|| format!("Failed to write Ogg file: {}", output.display()))?;

    let mut deleted_input = false;
    if delete_input {
        fs::remove_file(input)
            .with_context(|| format!("Failed to delete input file: {}", input.display()))?;
        tracing::info!("Deleted input file: {}", input.display());
        deleted_input = true;
    }

    print_report(
        &ConversionReport {
            input: input.display().to_string(),
            output: output.display().to_string(),
            input_bytes: input_bytes.len(),
            output_bytes: ogg_bytes.len(),
            deleted_input,
        },
        json,
    );

    Ok(())
}
