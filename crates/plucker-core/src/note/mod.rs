//! Note name parsing and equal-tempered frequency resolution.
//!
//! Pitches are parsed once into a [`Pitch`] value and resolved against an
//! explicit A4 reference; nothing here depends on global tuning state.

mod constants;
mod frequency;
mod pitch;


pub use constants::{MAX_OCTAVE, MIN_OCTAVE, REFERENCE_OCTAVE, SEMITONES_PER_OCTAVE, SEMITONE_MAP};
pub use frequency::{buffer_length, resolve_frequency};
pub use pitch::{Accidental, Letter, Pitch};
