//! Pluck command implementation
//!
//! Synthesizes a single note and reports on the result.

use anyhow::{anyhow, Result};
use colored::Colorize;
use plucker_core::oscillator::output_length;
use plucker_core::{
    generate_excitation, synthesize, ExcitationSpec, NoiseDistribution, Pitch, SampleBuffer,
    SynthConfig,
};
use std::process::ExitCode;

use super::json_output::RenderReport;
use super::reporting;

/// Parameters of a single pluck.
#[derive(Debug, Clone)]
pub struct PluckArgs {
    /// Note name.
    pub note: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Per-loop decay at the reference length.
    pub alpha: f64,
    /// Delay-line length at which `alpha` applies unmodified.
    pub reference_length: usize,
    /// Noise distribution name (uniform, bipolar, gaussian).
    pub distribution: String,
    /// Noise seed; system entropy when absent.
    pub seed: Option<u32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frequency of A4 in Hz.
    pub a4: f64,
}

impl PluckArgs {
    fn config(&self) -> SynthConfig {
        SynthConfig {
            sample_rate: self.sample_rate,
            reference_a4_hz: self.a4,
            reference_length: self.reference_length,
        }
    }
}

/// Run the pluck command
///
/// # Returns
/// Exit code: 0 on success, 1 on failure
pub fn run(
    args: &PluckArgs,
    samples_out: Option<&str>,
    normalize: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let result = render(args, samples_out, normalize);

    if json_output {
        return reporting::finish_json(result);
    }

    println!("{} {}", "Plucking:".cyan().bold(), args.note);
    let report = result?;
    reporting::print_render_report(&report);
    Ok(ExitCode::SUCCESS)
}

fn render(
    args: &PluckArgs,
    samples_out: Option<&str>,
    normalize: Option<f64>,
) -> Result<RenderReport> {
    reporting::check_normalize(normalize)?;
    let config = args.config();
    let decay = config.decay(args.alpha);
    let samples = pluck_samples(args)?;

    if let Some(path) = samples_out {
        reporting::write_samples(path, &samples, normalize)?;
    }
    Ok(reporting::render_report(
        &samples,
        config.sample_rate,
        1,
        &decay,
        samples_out,
    ))
}

/// Renders the samples of one pluck.
pub fn pluck_samples(args: &PluckArgs) -> Result<SampleBuffer> {
    let config = args.config();
    config.validate()?;
    let decay = config.decay(args.alpha);
    decay.validate()?;

    let pitch: Pitch = args.note.parse()?;
    let distribution = parse_distribution(&args.distribution)?;
    let num_samples = output_length(args.duration, config.sample_rate)?;

    let frequency = pitch.frequency(&config);
    let mut spec = ExcitationSpec::noise_for_frequency(frequency, config.sample_rate, distribution)?;
    if let Some(seed) = args.seed {
        spec = spec.with_seed(seed);
    }

    tracing::info!(
        note = %pitch,
        frequency,
        num_samples,
        seed = ?args.seed,
        "plucking note"
    );

    let excitation = generate_excitation(&spec, &mut rand::thread_rng())?;
    Ok(synthesize(&excitation, num_samples, &decay)?)
}

fn parse_distribution(name: &str) -> Result<NoiseDistribution> {
    match name {
        "uniform" => Ok(NoiseDistribution::Uniform),
        "bipolar" => Ok(NoiseDistribution::Bipolar),
        "gaussian" => Ok(NoiseDistribution::Gaussian),
        other => Err(anyhow!(
            "unknown distribution: {} (expected uniform, bipolar, or gaussian)",
            other
        )),
    }
}
