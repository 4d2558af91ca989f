//! Shared output helpers: summaries, sample files and error reporting.

use anyhow::{bail, Result};
use colored::Colorize;
use plucker_core::{DecaySpec, SampleBuffer, SynthError};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, JsonError, RenderReport};

/// Failure to write a samples file.
#[derive(Debug)]
pub struct WriteError {
    /// Destination path.
    pub path: String,
    /// Underlying I/O error.
    pub source: std::io::Error,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to write samples to {}: {}", self.path, self.source)
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Stable code for an error, taken from the first recognizable cause.
pub(crate) fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(synth) = cause.downcast_ref::<SynthError>() {
            return synth.code();
        }
        if cause.downcast_ref::<WriteError>().is_some() {
            return error_codes::FILE_WRITE;
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return error_codes::JSON_PARSE;
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return error_codes::FILE_READ;
        }
    }
    error_codes::INVALID_ARGUMENT
}

/// Converts an error into its JSON form, keeping the full context chain.
pub(crate) fn error_to_json(err: &anyhow::Error) -> JsonError {
    JsonError::new(error_code(err), format!("{:#}", err))
}

/// Prints a command result as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(output: &CommandOutput<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

/// Prints the JSON form of `result` and maps it to an exit code.
pub(crate) fn finish_json<T: Serialize>(result: Result<T>) -> Result<ExitCode> {
    match result {
        Ok(value) => {
            print_json(&CommandOutput::success(value))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print_json::<T>(&CommandOutput::failure(vec![error_to_json(&err)]))?;
            Ok(ExitCode::from(1))
        }
    }
}

/// Checks a `--normalize` target.
pub(crate) fn check_normalize(normalize: Option<f64>) -> Result<()> {
    if let Some(peak) = normalize {
        if !peak.is_finite() || peak <= 0.0 {
            bail!("--normalize must be a positive peak level, got {}", peak);
        }
    }
    Ok(())
}

/// Writes samples as a JSON array, optionally normalized to `normalize` peak.
///
/// This is the only place in the tool where levels are adjusted; synthesis
/// and mixing leave peaks alone.
pub fn write_samples(path: &str, samples: &SampleBuffer, normalize: Option<f64>) -> Result<()> {
    let to_write = match normalize {
        Some(peak) => samples.normalized(peak),
        None => samples.clone(),
    };

    let wrap = |source: std::io::Error| WriteError {
        path: path.to_string(),
        source,
    };
    let file = File::create(Path::new(path)).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &to_write).map_err(|e| wrap(e.into()))?;
    writer.flush().map_err(wrap)?;
    Ok(())
}

/// Builds the summary of a rendered signal.
pub(crate) fn render_report(
    samples: &SampleBuffer,
    sample_rate: u32,
    voices: usize,
    decay: &DecaySpec,
    samples_out: Option<&str>,
) -> RenderReport {
    let t60 = decay.t60_seconds(sample_rate as f64);
    RenderReport {
        sample_rate,
        num_samples: samples.len(),
        duration_seconds: samples.len() as f64 / sample_rate as f64,
        voices,
        peak: samples.peak(),
        rms: samples.rms(),
        t60_seconds: t60.is_finite().then_some(t60),
        samples_out: samples_out.map(str::to_string),
    }
}

/// Prints a render summary with colored labels.
pub(crate) fn print_render_report(report: &RenderReport) {
    println!(
        "  {} {} ({:.3} s @ {} Hz)",
        "Samples:".dimmed(),
        report.num_samples,
        report.duration_seconds,
        report.sample_rate
    );
    println!("  {} {}", "Voices:".dimmed(), report.voices);
    println!(
        "  {} {:.4}  {} {:.4}",
        "Peak:".dimmed(),
        report.peak,
        "RMS:".dimmed(),
        report.rms
    );
    match report.t60_seconds {
        Some(t60) => println!("  {} {:.3} s", "T60:".dimmed(), t60),
        None => println!("  {} {}", "T60:".dimmed(), "sustains indefinitely".yellow()),
    }
    if let Some(path) = &report.samples_out {
        println!("{} {}", "Wrote samples:".green().bold(), path);
    }
}
