//! Chord file loading.
//!
//! A chord file is JSON:
//!
//! ```json
//! {
//!   "config": { "sample_rate": 16000 },
//!   "duration_seconds": 2.0,
//!   "alpha": 0.995,
//!   "seed": 42,
//!   "voices": {
//!     "C3": { "gain": 1.0, "decay": { "alpha": 0.999 } },
//!     "E4": 0.7,
//!     "G4": 0.7
//!   }
//! }
//! ```
//!
//! `config`, `alpha` and `seed` are optional. Without a seed the excitation
//! noise comes from system entropy.

use anyhow::{Context, Result};
use plucker_core::{ChordSpec, DecaySpec, SynthConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default per-loop decay for chord files that omit `alpha`.
pub const DEFAULT_ALPHA: f64 = 0.996;

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

/// A chord and everything needed to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChordFile {
    /// Sample rate and tuning.
    #[serde(default)]
    pub config: SynthConfig,
    /// Output length in seconds.
    pub duration_seconds: f64,
    /// Default decay for voices without an override.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Base seed for per-voice noise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Voices keyed by note name.
    pub voices: ChordSpec,
}

impl ChordFile {
    /// Parses a chord file from JSON text.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse chord file")
    }

    /// Default decay, calibrated at the config's reference length.
    pub fn default_decay(&self) -> DecaySpec {
        self.config.decay(self.alpha)
    }
}

/// Reads and parses a chord file.
pub fn load_chord_file(path: &Path) -> Result<ChordFile> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chord file: {}", path.display()))?;
    ChordFile::from_json(&source)
}
