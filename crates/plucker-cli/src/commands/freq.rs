//! Freq command implementation
//!
//! Resolves note names to frequencies and delay-line lengths.

use anyhow::Result;
use colored::Colorize;
use plucker_core::{Pitch, SynthConfig};
use std::process::ExitCode;

use super::json_output::NoteFrequency;
use super::reporting;

/// Run the freq command
///
/// # Arguments
/// * `notes` - Note names to resolve
/// * `sample_rate` - Sample rate used for the delay-line length
/// * `a4` - Reference frequency of A4
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every note resolved, 1 otherwise
pub fn run(notes: &[String], sample_rate: u32, a4: f64, json_output: bool) -> Result<ExitCode> {
    let config = SynthConfig {
        sample_rate,
        reference_a4_hz: a4,
        ..SynthConfig::default()
    };
    let result = resolve_all(notes, &config);

    if json_output {
        return reporting::finish_json(result);
    }

    let resolved = result?;
    println!(
        "{} A4 = {} Hz, {} Hz sample rate",
        "Tuning:".cyan().bold(),
        config.reference_a4_hz,
        config.sample_rate
    );
    for note in &resolved {
        println!(
            "  {:<5} {:>+4} st  {:>10.3} Hz  {} {}",
            note.note.bold(),
            note.semitones_from_a4,
            note.frequency_hz,
            "M =".dimmed(),
            note.buffer_length
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves each note against `config`.
pub fn resolve_all(notes: &[String], config: &SynthConfig) -> Result<Vec<NoteFrequency>> {
    config.validate()?;
    notes
        .iter()
        .map(|name| {
            let pitch: Pitch = name.parse()?;
            Ok(NoteFrequency {
                note: pitch.to_string(),
                semitones_from_a4: pitch.semitones_from_a4(),
                frequency_hz: pitch.frequency(config),
                buffer_length: pitch.buffer_length(config)?,
            })
        })
        .collect()
}
