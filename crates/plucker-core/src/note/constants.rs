//! Constants for pitch resolution.

/// Semitone distance of each natural letter from A within octave 4, indexed
/// by [`Letter`](super::Letter) in A to G order.
///
/// C through G sit below A4, so `C4` is 9 semitones under A4 and `B4` is
/// 2 semitones above it.
pub const SEMITONE_MAP: [i32; 7] = [0, 2, -9, -7, -5, -4, -2];

/// Octave number of the reference pitch A4.
pub const REFERENCE_OCTAVE: i32 = 4;

/// Semitones per octave in equal temperament.
pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Lowest octave accepted when parsing note names.
pub const MIN_OCTAVE: i32 = -100;

/// Highest octave accepted when parsing note names.
pub const MAX_OCTAVE: i32 = 100;
