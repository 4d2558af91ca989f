//! Karplus-Strong feedback loop.
//!
//! The oscillator evaluates
//!
//! ```text
//! y[n] = x[n] + a * y[n - M]
//! ```
//!
//! where `x` is the excitation (zero past index `M - 1`), `M` is the
//! excitation length and `a` is the per-loop feedback gain. The loop is a
//! delay line of length `M`: each output sample is read from the line and
//! written back scaled by `a`, so only `M` samples of state are kept no
//! matter how long the output is.
//!
//! # Decay normalization
//!
//! With a fixed per-loop gain, short delay lines (high notes) pass through
//! the gain more often per second and die away faster. The gain is therefore
//! derived from a user-facing `alpha` as `a = alpha^(M / reference_length)`,
//! which makes the decay time independent of `M`: `alpha` is the per-loop gain
//! of a line exactly `reference_length` samples long.

use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;
use crate::config::DEFAULT_REFERENCE_LENGTH;
use crate::error::{SynthError, SynthResult};

/// Decay parameters for one oscillator run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecaySpec {
    /// Per-loop gain at the reference length, in (0, 1]. 1 never decays.
    pub alpha: f64,
    /// Delay-line length at which `alpha` applies unmodified.
    #[serde(default = "default_reference_length")]
    pub reference_length: usize,
}

fn default_reference_length() -> usize {
    DEFAULT_REFERENCE_LENGTH
}

impl DecaySpec {
    /// Creates a decay with the default reference length of 50 samples.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            reference_length: DEFAULT_REFERENCE_LENGTH,
        }
    }

    /// Sets the reference length.
    pub fn with_reference_length(mut self, reference_length: usize) -> Self {
        self.reference_length = reference_length;
        self
    }

    /// A lossless loop.
    pub fn undamped() -> Self {
        Self::new(1.0)
    }

    /// Checks `alpha` is in (0, 1] and the reference length is non-zero.
    pub fn validate(&self) -> SynthResult<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(SynthError::invalid_param(
                "alpha",
                format!("must be in (0, 1], got {}", self.alpha),
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

    /// Per-loop feedback gain for a delay line of `delay_length` samples.
    pub fn coefficient(&self, delay_length: usize) -> f64 {
        decay_coefficient(self.alpha, delay_length, self.reference_length)
    }

    /// Seconds for the envelope to fall by 60 dB.
    ///
    /// Because of the normalization this does not depend on the delay-line
    /// length. Infinite when `alpha` is 1.
    pub fn t60_seconds(&self, sample_rate: f64) -> f64 {
        if self.alpha >= 1.0 {
            return f64::INFINITY;
        }
        let samples = self.reference_length as f64 * (1e-3_f64).ln() / self.alpha.ln();
        samples / sample_rate
    }
}

/// Pitch-normalized feedback gain: `alpha^(delay_length / reference_length)`.
pub fn decay_coefficient(alpha: f64, delay_length: usize, reference_length: usize) -> f64 {
    alpha.powf(delay_length as f64 / reference_length as f64)
}

/// Streaming Karplus-Strong oscillator.
///
/// Yields the recurrence one sample at a time, indefinitely. Use
/// [`synthesize`] for a fixed-length buffer.
#[derive(Debug, Clone)]
pub struct KarplusStrong {
    delay_line: Vec<f64>,
    position: usize,
    feedback: f64,
}

impl KarplusStrong {
    /// Loads `excitation` into the delay line.
    ///
    /// # Errors
    /// `InvalidParameters` if the excitation is empty or `decay` is invalid.
    pub fn new(excitation: &SampleBuffer, decay: &DecaySpec) -> SynthResult<Self> {
        if excitation.is_empty() {
            return Err(SynthError::invalid_param(
                "excitation",
                "buffer length M must be at least 1",
            ));
        }
        decay.validate()?;

        let feedback = decay.coefficient(excitation.len());
        tracing::trace!(
            delay_length = excitation.len(),
            alpha = decay.alpha,
            feedback,
            "karplus-strong loop"
        );

        Ok(Self {
            delay_line: excitation.as_slice().to_vec(),
            position: 0,
            feedback,
        })
    }

    /// Delay-line length M.
    pub fn delay_length(&self) -> usize {
        self.delay_line.len()
    }

    /// Per-loop feedback gain `a`.
    pub fn feedback(&self) -> f64 {
        self.feedback
    }

    /// Produces the next output sample.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        let current = self.delay_line[self.position];
        self.delay_line[self.position] = self.feedback * current;
        self.position += 1;
        if self.position == self.delay_line.len() {
            self.position = 0;
        }
        current
    }
}

impl Iterator for KarplusStrong {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_sample())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Runs the feedback loop over `excitation` for `output_length` samples.
///
/// If the excitation is longer than the output, the result is exactly its
/// first `output_length` samples.
///
/// # Errors
/// `InvalidParameters` if the excitation is empty, `alpha` is outside
/// (0, 1] or the reference length is 0.
///
/// # Examples
/// ```
/// use plucker_core::buffer::SampleBuffer;
/// use plucker_core::oscillator::{synthesize, DecaySpec};
///
/// let excitation = SampleBuffer::from_vec(vec![1.0, 0.0, 0.0, 0.0, 0.0]);
/// let decay = DecaySpec::new(0.5).with_reference_length(5);
/// let out = synthesize(&excitation, 10, &decay).unwrap();
/// assert_eq!(
///     out.into_vec(),
///     vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0]
/// );
/// ```
pub fn synthesize(
    excitation: &SampleBuffer,
    output_length: usize,
    decay: &DecaySpec,
) -> SynthResult<SampleBuffer> {
    check_output_length(output_length)?;
    let oscillator = KarplusStrong::new(excitation, decay)?;
    Ok(oscillator.take(output_length).collect())
}

/// Converts a duration to a sample count at `sample_rate`.
///
/// # Errors
/// `InvalidParameters` for negative or non-finite durations.
pub fn output_length(duration_seconds: f64, sample_rate: u32) -> SynthResult<usize> {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(SynthError::invalid_param(
            "duration",
            format!("must be a non-negative number of seconds, got {}", duration_seconds),
        ));
    }
    let samples = (duration_seconds * sample_rate as f64).round();
    if samples > MAX_OUTPUT_LENGTH as f64 {
        return Err(SynthError::invalid_param(
            "duration",
            format!(
                "{} s at {} Hz exceeds the largest allocatable buffer",
                duration_seconds, sample_rate
            ),
        ));
    }
    Ok(samples as usize)
}

/// Largest output length a `SampleBuffer` can hold.
pub const MAX_OUTPUT_LENGTH: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// Rejects output lengths no buffer could be allocated for.
pub fn check_output_length(output_length: usize) -> SynthResult<()> {
    if output_length > MAX_OUTPUT_LENGTH {
        return Err(SynthError::invalid_param(
            "output_length",
            format!("must be at most {}, got {}", MAX_OUTPUT_LENGTH, output_length),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(samples: &[f64]) -> SampleBuffer {
        SampleBuffer::from_vec(samples.to_vec())
    }

    #[test]
    fn test_impulse_scenario() {
        let out = synthesize(
            &buffer(&[1.0, 0.0, 0.0, 0.0, 0.0]),
            10,
            &DecaySpec::new(0.5).with_reference_length(5),
        )
        .unwrap();
        assert_eq!(
            out.into_vec(),
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_matches_direct_recurrence() {
        let x = [0.3, -0.7, 0.2, 0.9, -0.1, 0.4, 0.05];
        let decay = DecaySpec::new(0.93).with_reference_length(11);
        let m = x.len();
        let n = 60;
        let a = decay_coefficient(0.93, m, 11);

        let mut expected = vec![0.0; n];
        for i in 0..n {
            let input = if i < m { x[i] } else { 0.0 };
            let fb = if i >= m { a * expected[i - m] } else { 0.0 };
            expected[i] = input + fb;
        }

        let out = synthesize(&buffer(&x), n, &decay).unwrap();
        assert_eq!(out.into_vec(), expected);
    }

    #[test]
    fn test_coefficient_at_reference_length_is_alpha() {
        let decay = DecaySpec::new(0.99).with_reference_length(50);
        assert_eq!(decay.coefficient(50), 0.99);
    }

    #[test]
    fn test_coefficient_half_reference_length() {
        let decay = DecaySpec::new(0.99).with_reference_length(50);
        assert_eq!(decay.coefficient(25), 0.99_f64.powf(25.0 / 50.0));
        assert!((decay.coefficient(25) - 0.99_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_oscillator_reports_feedback() {
        let osc = KarplusStrong::new(&SampleBuffer::zeros(25), &DecaySpec::new(0.99)).unwrap();
        assert_eq!(osc.delay_length(), 25);
        assert_eq!(osc.feedback(), 0.99_f64.powf(0.5));
    }

    #[test]
    fn test_undamped_is_periodic() {
        let x = [0.5, -0.25, 0.75];
        let out = synthesize(&buffer(&x), 30, &DecaySpec::undamped()).unwrap();
        assert!(out.is_periodic(3, 0, 0.0));
        assert_eq!(&out.as_slice()[27..], &x);
    }

    #[test]
    fn test_excitation_longer_than_output() {
        let x = [0.1, 0.2, 0.3, 0.4, 0.5];
        let out = synthesize(&buffer(&x), 3, &DecaySpec::new(0.5)).unwrap();
        assert_eq!(out.into_vec(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_single_sample_loop_is_geometric() {
        let decay = DecaySpec::new(0.8).with_reference_length(1);
        let out = synthesize(&buffer(&[1.0]), 5, &decay).unwrap();
        let mut expected = vec![1.0];
        for i in 1..5 {
            let prev: f64 = expected[i - 1];
            expected.push(0.8 * prev);
        }
        assert_eq!(out.into_vec(), expected);
    }

    #[test]
    fn test_zero_output_length() {
        let out = synthesize(&buffer(&[1.0, 2.0]), 0, &DecaySpec::new(0.9)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_rejects_empty_excitation() {
        let err = synthesize(&SampleBuffer::zeros(0), 10, &DecaySpec::new(0.9)).unwrap_err();
        assert!(matches!(err, SynthError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_bad_alpha() {
        for alpha in [1.5, 0.0, -0.5, f64::NAN] {
            let err = synthesize(&buffer(&[1.0]), 10, &DecaySpec::new(alpha)).unwrap_err();
            assert!(
                matches!(err, SynthError::InvalidParameters { ref name, .. } if name == "alpha"),
                "alpha {} gave {:?}",
                alpha,
                err
            );
        }
    }

    #[test]
    fn test_rejects_zero_reference_length() {
        let decay = DecaySpec::new(0.9).with_reference_length(0);
        assert!(synthesize(&buffer(&[1.0]), 10, &decay).is_err());
    }

    #[test]
    fn test_t60_is_independent_of_delay_length() {
        let decay = DecaySpec::new(0.99);
        let t60 = decay.t60_seconds(16000.0);
        // 50 * ln(0.001) / ln(0.99) samples
        let expected = 50.0 * (1e-3_f64).ln() / 0.99_f64.ln() / 16000.0;
        assert!((t60 - expected).abs() < 1e-12);
        assert!(DecaySpec::undamped().t60_seconds(16000.0).is_infinite());
    }

    #[test]
    fn test_output_length() {
        assert_eq!(output_length(1.0, 16000).unwrap(), 16000);
        assert_eq!(output_length(0.0, 16000).unwrap(), 0);
        assert!(output_length(-1.0, 16000).is_err());
        assert!(output_length(f64::NAN, 16000).is_err());
    }

    #[test]
    fn test_output_length_rejects_unallocatable_durations() {
        let err = output_length(1e300, 16000).unwrap_err();
        assert!(matches!(err, SynthError::InvalidParameters { ref name, .. } if name == "duration"));

        let err =
            synthesize(&buffer(&[1.0, 0.0]), usize::MAX, &DecaySpec::undamped()).unwrap_err();
        assert!(
            matches!(err, SynthError::InvalidParameters { ref name, .. } if name == "output_length")
        );
        assert!(check_output_length(MAX_OUTPUT_LENGTH).is_ok());
    }

    #[test]
    fn test_decay_json_default_reference_length() {
        let decay: DecaySpec = serde_json::from_str(r#"{"alpha": 0.995}"#).unwrap();
        assert_eq!(decay, DecaySpec::new(0.995));
    }
}
