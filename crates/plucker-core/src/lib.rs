//! Plucker Core
//!
//! Karplus-Strong plucked-string synthesis: a short excitation buffer is
//! circulated through a delay line whose feedback gain slowly drains it,
//! producing a pitched, decaying tone.
//!
//! # Overview
//!
//! - [`note`] - Note names to equal-tempered frequencies and delay lengths
//! - [`excitation`] - Noise, shaped or caller-supplied excitation buffers
//! - [`oscillator`] - The feedback recurrence with pitch-normalized decay
//! - [`chord`] - Per-pitch voices mixed into one buffer
//! - [`mixer`] - Gain/offset layer summing
//! - [`buffer`] - Fixed-length sample buffers and signal measurements
//! - [`rng`] - Seeded PCG32 generators and per-voice seed derivation
//! - [`config`] - Sample rate and tuning reference
//!
//! # Determinism
//!
//! Every call is a pure function of its inputs and the random source passed
//! in. Seeded calls use PCG32, so the same seed always gives the same samples.
//!
//! # Example
//!
//! ```
//! use plucker_core::{synthesize_chord_seeded, ChordSpec, SynthConfig};
//!
//! let config = SynthConfig::default();
//! let chord = ChordSpec::from_gains(&[("C4", 1.0), ("E4", 0.8), ("G4", 0.8)]).unwrap();
//! let out = synthesize_chord_seeded(&chord, 16000, &config.decay(0.996), &config, 42).unwrap();
//! assert_eq!(out.len(), 16000);
//! ```

pub mod buffer;
pub mod chord;
pub mod config;
pub mod error;
pub mod excitation;
pub mod mixer;
pub mod note;
pub mod oscillator;
pub mod rng;

// Re-export main types at crate root
pub use buffer::SampleBuffer;
#[cfg(feature = "parallel")]
pub use chord::synthesize_chord_parallel;
pub use chord::{pluck, synthesize_chord, synthesize_chord_seeded, ChordSpec, VoiceSpec};
pub use config::SynthConfig;
pub use error::{SynthError, SynthResult};
pub use excitation::{generate_excitation, ExcitationSpec, NoiseDistribution};
pub use note::{resolve_frequency, Pitch};
pub use oscillator::{synthesize, DecaySpec, KarplusStrong};
