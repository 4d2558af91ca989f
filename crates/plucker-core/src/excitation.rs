//! Excitation buffers that seed the Karplus-Strong delay line.
//!
//! The excitation length sets the pitch (one period of the loop) and its
//! content sets the timbre. Noise is the classic choice; explicit buffers let
//! callers reproduce a specific timbre exactly.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;
use crate::error::{SynthError, SynthResult};
use crate::note::buffer_length;
use crate::rng::create_rng;

/// Distribution noise samples are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseDistribution {
    /// Uniform on [0, 1).
    #[default]
    Uniform,
    /// Uniform on [-1, 1), zero mean.
    Bipolar,
    /// Standard normal (mean 0, variance 1).
    Gaussian,
}

impl NoiseDistribution {
    /// Draws one sample.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            NoiseDistribution::Uniform => rng.gen::<f64>(),
            NoiseDistribution::Bipolar => rng.gen::<f64>() * 2.0 - 1.0,
            NoiseDistribution::Gaussian => rng.sample(StandardNormal),
        }
    }
}

/// Deterministic excitation waveforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcitationShape {
    /// A single 1.0 at index 0 (sharp pluck).
    Impulse,
    /// Ramp from -1 towards 1 (more harmonic content).
    Sawtooth,
    /// Triangle from -1 up to 1 and back (softer sound).
    Triangle,
}

impl ExcitationShape {
    fn render(self, length: usize) -> Vec<f64> {
        match self {
            ExcitationShape::Impulse => {
                let mut line = vec![0.0; length];
                line[0] = 1.0;
                line
            }
            ExcitationShape::Sawtooth => (0..length)
                .map(|i| {
                    let t = i as f64 / length as f64;
                    2.0 * t - 1.0
                })
                .collect(),
            ExcitationShape::Triangle => (0..length)
                .map(|i| {
                    let t = i as f64 / length as f64;
                    if t < 0.5 {
                        4.0 * t - 1.0
                    } else {
                        3.0 - 4.0 * t
                    }
                })
                .collect(),
        }
    }
}

/// How to obtain an excitation buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExcitationSpec {
    /// Use these samples as-is.
    Explicit {
        /// The excitation samples.
        samples: SampleBuffer,
    },
    /// Fill `length` samples with i.i.d. noise.
    Noise {
        /// Buffer length M.
        length: usize,
        /// Sample distribution.
        #[serde(default)]
        distribution: NoiseDistribution,
        /// Seed for a private generator; `None` draws from the caller's source.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u32>,
    },
    /// Render a deterministic waveform of `length` samples.
    Shape {
        /// Buffer length M.
        length: usize,
        /// Waveform.
        shape: ExcitationShape,
    },
}

impl ExcitationSpec {
    /// Wraps caller-supplied samples.
    pub fn explicit(samples: impl Into<SampleBuffer>) -> Self {
        ExcitationSpec::Explicit {
            samples: samples.into(),
        }
    }

    /// Noise request with the length of one period of `frequency`.
    ///
    /// The length is `round(sample_rate / frequency)`, clamped to at least 1.
    pub fn noise_for_frequency(
        frequency: f64,
        sample_rate: u32,
        distribution: NoiseDistribution,
    ) -> SynthResult<Self> {
        Ok(ExcitationSpec::Noise {
            length: buffer_length(frequency, sample_rate)?,
            distribution,
            seed: None,
        })
    }

    /// Sets the seed of a noise request. Other variants are returned unchanged.
    pub fn with_seed(self, seed: u32) -> Self {
        match self {
            ExcitationSpec::Noise {
                length,
                distribution,
                ..
            } => ExcitationSpec::Noise {
                length,
                distribution,
                seed: Some(seed),
            },
            other => other,
        }
    }

    /// Buffer length M this spec produces.
    pub fn len(&self) -> usize {
        match self {
            ExcitationSpec::Explicit { samples } => samples.len(),
            ExcitationSpec::Noise { length, .. } | ExcitationSpec::Shape { length, .. } => *length,
        }
    }

    /// Returns true if the spec would produce an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the length without generating anything.
    pub fn validate(&self) -> SynthResult<()> {
        if self.is_empty() {
            return Err(SynthError::invalid_buffer_length(
                "excitation length must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Produces the excitation buffer described by `spec`.
///
/// Explicit buffers pass through unchanged. Noise requests with a seed use a
/// private PCG32 generator and leave `rng` untouched; unseeded requests draw
/// `length` samples from `rng`.
///
/// # Errors
/// `InvalidBufferLength` if the spec describes an empty buffer.
pub fn generate_excitation<R: Rng + ?Sized>(
    spec: &ExcitationSpec,
    rng: &mut R,
) -> SynthResult<SampleBuffer> {
    spec.validate()?;

    let buffer = match spec {
        ExcitationSpec::Explicit { samples } => samples.clone(),
        ExcitationSpec::Noise {
            length,
            distribution,
            seed: Some(seed),
        } => fill_noise(*length, *distribution, &mut create_rng(*seed)),
        ExcitationSpec::Noise {
            length,
            distribution,
            seed: None,
        } => fill_noise(*length, *distribution, rng),
        ExcitationSpec::Shape { length, shape } => SampleBuffer::from_vec(shape.render(*length)),
    };

    tracing::trace!(length = buffer.len(), "generated excitation");
    Ok(buffer)
}

/// Like [`generate_excitation`], drawing unseeded noise from system entropy.
pub fn generate_excitation_with_entropy(spec: &ExcitationSpec) -> SynthResult<SampleBuffer> {
    generate_excitation(spec, &mut rand::thread_rng())
}

fn fill_noise<R: Rng + ?Sized>(
    length: usize,
    distribution: NoiseDistribution,
    rng: &mut R,
) -> SampleBuffer {
    (0..length).map(|_| distribution.sample(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_is_passthrough() {
        let samples = vec![0.1, -0.2, 0.3];
        let spec = ExcitationSpec::explicit(samples.clone());
        let mut rng = create_rng(1);
        let buffer = generate_excitation(&spec, &mut rng).unwrap();
        assert_eq!(buffer.into_vec(), samples);
    }

    #[test]
    fn test_empty_explicit_rejected() {
        let spec = ExcitationSpec::explicit(Vec::new());
        let err = generate_excitation(&spec, &mut create_rng(1)).unwrap_err();
        assert!(matches!(err, SynthError::InvalidBufferLength { .. }));
    }

    #[test]
    fn test_zero_length_noise_rejected() {
        let spec = ExcitationSpec::Noise {
            length: 0,
            distribution: NoiseDistribution::Uniform,
            seed: None,
        };
        let err = generate_excitation(&spec, &mut create_rng(1)).unwrap_err();
        assert!(matches!(err, SynthError::InvalidBufferLength { .. }));
    }

    #[test]
    fn test_uniform_noise_range() {
        let spec = ExcitationSpec::Noise {
            length: 1000,
            distribution: NoiseDistribution::Uniform,
            seed: None,
        };
        let buffer = generate_excitation(&spec, &mut create_rng(7)).unwrap();
        assert_eq!(buffer.len(), 1000);
        assert!(buffer.iter().all(|&s| (0.0..1.0).contains(&s)));
    }

    #[test]
    fn test_bipolar_noise_range() {
        let spec = ExcitationSpec::Noise {
            length: 1000,
            distribution: NoiseDistribution::Bipolar,
            seed: None,
        };
        let buffer = generate_excitation(&spec, &mut create_rng(7)).unwrap();
        assert!(buffer.iter().all(|&s| (-1.0..1.0).contains(&s)));
        assert!(buffer.iter().any(|&s| s < 0.0));
    }

    #[test]
    fn test_gaussian_noise_moments() {
        let spec = ExcitationSpec::Noise {
            length: 20000,
            distribution: NoiseDistribution::Gaussian,
            seed: Some(3),
        };
        let buffer = generate_excitation(&spec, &mut create_rng(0)).unwrap();
        let mean = buffer.iter().sum::<f64>() / buffer.len() as f64;
        let var = buffer.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / buffer.len() as f64;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.1, "variance {}", var);
    }

    #[test]
    fn test_seeded_noise_ignores_injected_source() {
        let spec = ExcitationSpec::Noise {
            length: 64,
            distribution: NoiseDistribution::Uniform,
            seed: Some(42),
        };
        let a = generate_excitation(&spec, &mut create_rng(1)).unwrap();
        let b = generate_excitation(&spec, &mut create_rng(2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unseeded_noise_follows_injected_source() {
        let spec = ExcitationSpec::Noise {
            length: 64,
            distribution: NoiseDistribution::Uniform,
            seed: None,
        };
        let a = generate_excitation(&spec, &mut create_rng(1)).unwrap();
        let b = generate_excitation(&spec, &mut create_rng(1)).unwrap();
        let c = generate_excitation(&spec, &mut create_rng(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_noise_for_frequency_length() {
        let spec =
            ExcitationSpec::noise_for_frequency(440.0, 16000, NoiseDistribution::Uniform).unwrap();
        assert_eq!(spec.len(), 36);
        assert!(ExcitationSpec::noise_for_frequency(0.0, 16000, NoiseDistribution::Uniform).is_err());
    }

    #[test]
    fn test_shapes() {
        let mut rng = create_rng(0);
        let impulse = generate_excitation(
            &ExcitationSpec::Shape {
                length: 4,
                shape: ExcitationShape::Impulse,
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(impulse.into_vec(), vec![1.0, 0.0, 0.0, 0.0]);

        let saw = generate_excitation(
            &ExcitationSpec::Shape {
                length: 4,
                shape: ExcitationShape::Sawtooth,
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(saw.into_vec(), vec![-1.0, -0.5, 0.0, 0.5]);

        let tri = generate_excitation(
            &ExcitationSpec::Shape {
                length: 4,
                shape: ExcitationShape::Triangle,
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(tri.into_vec(), vec![-1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_spec_json_format() {
        let spec: ExcitationSpec =
            serde_json::from_str(r#"{"type": "noise", "length": 50, "seed": 9}"#).unwrap();
        assert_eq!(
            spec,
            ExcitationSpec::Noise {
                length: 50,
                distribution: NoiseDistribution::Uniform,
                seed: Some(9),
            }
        );

        let spec: ExcitationSpec =
            serde_json::from_str(r#"{"type": "explicit", "samples": [1.0, 0.0]}"#).unwrap();
        assert_eq!(spec, ExcitationSpec::explicit(vec![1.0, 0.0]));
    }
}
