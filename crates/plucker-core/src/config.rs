//! Synthesis configuration threaded explicitly through every call.

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};
use crate::oscillator::DecaySpec;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Default A4 reference frequency in Hz.
pub const DEFAULT_REFERENCE_A4_HZ: f64 = 440.0;

/// Default reference buffer length used to calibrate decay across pitches.
pub const DEFAULT_REFERENCE_LENGTH: usize = 50;

/// Global synthesis parameters.
///
/// Nothing in the crate reads process-wide state; whatever needs a sample rate
/// or a tuning reference takes a `SynthConfig` (or the individual value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frequency of A4 in Hz.
    pub reference_a4_hz: f64,
    /// Buffer length at which `alpha` is the per-loop decay, unmodified.
    pub reference_length: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            reference_a4_hz: DEFAULT_REFERENCE_A4_HZ,
            reference_length: DEFAULT_REFERENCE_LENGTH,
        }
    }
}

impl SynthConfig {
    /// Creates a config with the given sample rate and default tuning.
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> SynthResult<()> {
        if self.sample_rate == 0 {
            return Err(SynthError::invalid_param(
                "sample_rate",
                "must be greater than 0",
            ));
        }
        if !self.reference_a4_hz.is_finite() || self.reference_a4_hz <= 0.0 {
            return Err(SynthError::invalid_param(
                "reference_a4_hz",
                format!("must be a positive finite frequency, got {}", self.reference_a4_hz),
            ));
        }
        if self.reference_length == 0 {
            return Err(SynthError::invalid_param(
                "reference_length",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Decay spec for `alpha` calibrated at this config's reference length.
    pub fn decay(&self, alpha: f64) -> DecaySpec {
        DecaySpec::new(alpha).with_reference_length(self.reference_length)
    }

    /// Sample rate as `f64`.
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate as f64
    }
}
