//! Chord command implementation
//!
//! Loads a chord file, mixes its voices and reports on the result.

use anyhow::Result;
use colored::Colorize;
use plucker_core::oscillator::output_length;
use plucker_core::{synthesize_chord, SampleBuffer};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::RenderReport;
use super::reporting;
use crate::input::{load_chord_file, ChordFile};

/// Run the chord command
///
/// # Arguments
/// * `spec_path` - Path to the chord file
/// * `samples_out` - Optional path for the rendered samples
/// * `normalize` - Optional peak level for the written samples
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on failure
pub fn run(
    spec_path: &str,
    samples_out: Option<&str>,
    normalize: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let result = render(spec_path, samples_out, normalize);

    if json_output {
        return reporting::finish_json(result);
    }

    println!("{} {}", "Chord:".cyan().bold(), spec_path);
    let report = result?;
    reporting::print_render_report(&report);
    Ok(ExitCode::SUCCESS)
}

fn render(
    spec_path: &str,
    samples_out: Option<&str>,
    normalize: Option<f64>,
) -> Result<RenderReport> {
    reporting::check_normalize(normalize)?;
    let file = load_chord_file(Path::new(spec_path))?;
    let samples = chord_samples(&file)?;

    if let Some(path) = samples_out {
        reporting::write_samples(path, &samples, normalize)?;
    }
    Ok(reporting::render_report(
        &samples,
        file.config.sample_rate,
        file.voices.len(),
        &file.default_decay(),
        samples_out,
    ))
}

/// Renders the mixed samples of a chord file.
///
/// Seeded files render the same samples on every run (and on every thread
/// count when built with `parallel`); unseeded files draw from system entropy.
pub fn chord_samples(file: &ChordFile) -> Result<SampleBuffer> {
    file.config.validate()?;
    let num_samples = output_length(file.duration_seconds, file.config.sample_rate)?;
    let decay = file.default_decay();

    tracing::info!(
        voices = file.voices.len(),
        num_samples,
        alpha = decay.alpha,
        seed = ?file.seed,
        "rendering chord"
    );

    let samples = match file.seed {
        Some(seed) => render_seeded(file, num_samples, seed)?,
        None => synthesize_chord(
            &file.voices,
            num_samples,
            &decay,
            &file.config,
            &mut rand::thread_rng(),
        )?,
    };
    Ok(samples)
}

#[cfg(not(feature = "parallel"))]
fn render_seeded(file: &ChordFile, num_samples: usize, seed: u32) -> Result<SampleBuffer> {
    Ok(plucker_core::synthesize_chord_seeded(
        &file.voices,
        num_samples,
        &file.default_decay(),
        &file.config,
        seed,
    )?)
}

#[cfg(feature = "parallel")]
fn render_seeded(file: &ChordFile, num_samples: usize, seed: u32) -> Result<SampleBuffer> {
    Ok(plucker_core::synthesize_chord_parallel(
        &file.voices,
        num_samples,
        &file.default_decay(),
        &file.config,
        seed,
    )?)
}
