//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag on every command so that scripts can
//! parse results and errors without scraping colored text.

use plucker_core::SynthError;
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// Library errors pass through their own `SYNTH_XXX` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// File could not be written
    pub const FILE_WRITE: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Invalid command-line value
    pub const INVALID_ARGUMENT: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "SYNTH_003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&SynthError> for JsonError {
    fn from(err: &SynthError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// Frequency of one resolved note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteFrequency {
    /// Canonical note name.
    pub note: String,
    /// Semitones from A4.
    pub semitones_from_a4: i32,
    /// Frequency in Hz.
    pub frequency_hz: f64,
    /// Delay-line length in samples.
    pub buffer_length: usize,
}

/// Summary of a rendered signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderReport {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples rendered.
    pub num_samples: usize,
    /// Duration in seconds.
    pub duration_seconds: f64,
    /// Number of voices mixed.
    pub voices: usize,
    /// Peak absolute sample value.
    pub peak: f64,
    /// RMS level.
    pub rms: f64,
    /// Seconds for the default decay to fall 60 dB (absent when undamped).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t60_seconds: Option<f64>,
    /// Path the samples were written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples_out: Option<String>,
}

/// Top-level JSON output of every command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded.
    pub success: bool,
    /// Errors, empty on success.
    pub errors: Vec<JsonError>,
    /// Command result, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> CommandOutput<T> {
    /// Successful output.
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}
