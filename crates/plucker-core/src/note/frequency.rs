//! Pitch to frequency and frequency to delay-line length conversion.

use super::constants::SEMITONES_PER_OCTAVE;
use super::pitch::Pitch;
use crate::config::SynthConfig;
use crate::error::{SynthError, SynthResult};

/// Resolves a pitch to its equal-tempered frequency in Hz.
///
/// Uses `f = reference * 2^(n/12)` where `n` is the semitone distance from A4.
/// The result is not rounded.
///
/// # Examples
/// ```
/// use plucker_core::note::{resolve_frequency, Pitch};
///
/// let a4: Pitch = "A4".parse().unwrap();
/// assert_eq!(resolve_frequency(&a4, 440.0), 440.0);
///
/// let c5: Pitch = "C5".parse().unwrap();
/// assert!((resolve_frequency(&c5, 440.0) - 523.2511).abs() < 1e-3);
/// ```
pub fn resolve_frequency(pitch: &Pitch, reference_a4_hz: f64) -> f64 {
    let n = pitch.semitones_from_a4() as f64;
    reference_a4_hz * 2.0_f64.powf(n / SEMITONES_PER_OCTAVE as f64)
}

/// Number of samples in one period of `frequency`, as an integer delay line.
///
/// Computes `round(sample_rate / frequency)`, clamped to at least 1. The
/// rounding trades a little intonation accuracy for an integer delay line.
///
/// # Errors
/// `InvalidBufferLength` if the frequency is not a positive finite value or
/// the sample rate is zero.
pub fn buffer_length(frequency: f64, sample_rate: u32) -> SynthResult<usize> {
    if sample_rate == 0 {
        return Err(SynthError::invalid_buffer_length(
            "sample rate must be greater than 0",
        ));
    }
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(SynthError::invalid_buffer_length(format!(
            "frequency must be positive and finite, got {} Hz",
            frequency
        )));
    }

    let length = (sample_rate as f64 / frequency).round();
    if !length.is_finite() || length > usize::MAX as f64 {
        return Err(SynthError::invalid_buffer_length(format!(
            "{} Hz at {} Hz sample rate needs an unrepresentable buffer",
            frequency, sample_rate
        )));
    }
    Ok((length as usize).max(1))
}

impl Pitch {
    /// Frequency of this pitch under `config`'s tuning reference.
    pub fn frequency(&self, config: &SynthConfig) -> f64 {
        resolve_frequency(self, config.reference_a4_hz)
    }

    /// Delay-line length for this pitch at `config`'s sample rate.
    pub fn buffer_length(&self, config: &SynthConfig) -> SynthResult<usize> {
        buffer_length(self.frequency(config), config.sample_rate)
    }
}
