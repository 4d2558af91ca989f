//! Pitch type and note name parsing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::constants::{
    MAX_OCTAVE, MIN_OCTAVE, REFERENCE_OCTAVE, SEMITONES_PER_OCTAVE, SEMITONE_MAP,
};
use crate::error::SynthError;

/// Natural note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// Parses a letter, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            _ => None,
        }
    }

    /// Uppercase character for this letter.
    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
        }
    }

    /// Semitones from A within octave 4.
    pub fn semitone_offset(self) -> i32 {
        SEMITONE_MAP[self as usize]
    }
}

/// Sharp, flat or natural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Accidental {
    Flat,
    #[default]
    Natural,
    Sharp,
}

impl Accidental {
    /// Semitone adjustment: -1, 0 or +1.
    pub fn semitones(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
        }
    }
}

/// A validated equal-tempered pitch such as `C4`, `F#3` or `Bb5`.
///
/// Pitches order by sounding height first, so enharmonic spellings (`A#4`,
/// `Bb4`) sit next to each other but remain distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i32,
}

impl Pitch {
    /// Creates a pitch from its parts.
    pub fn new(letter: Letter, accidental: Accidental, octave: i32) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    /// Natural pitch (no accidental).
    pub fn natural(letter: Letter, octave: i32) -> Self {
        Self::new(letter, Accidental::Natural, octave)
    }

    /// The reference pitch A4.
    pub fn a4() -> Self {
        Self::natural(Letter::A, REFERENCE_OCTAVE)
    }

    /// Signed semitone distance from A4.
    ///
    /// Parsed pitches lie within [`MIN_OCTAVE`]..=[`MAX_OCTAVE`]; pitches
    /// built by hand outside that range saturate instead of overflowing.
    pub fn semitones_from_a4(&self) -> i32 {
        SEMITONES_PER_OCTAVE
            .saturating_mul(self.octave.saturating_sub(REFERENCE_OCTAVE))
            .saturating_add(self.letter.semitone_offset())
            .saturating_add(self.accidental.semitones())
    }
}

impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semitones_from_a4()
            .cmp(&other.semitones_from_a4())
            .then(self.letter.cmp(&other.letter))
            .then(self.accidental.cmp(&other.accidental))
            .then(self.octave.cmp(&other.octave))
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letter.as_char(),
            self.accidental.symbol(),
            self.octave
        )
    }
}

impl FromStr for Pitch {
    type Err = SynthError;

    /// Parses `<letter>[#|b]<octave>`.
    ///
    /// The letter is case-insensitive, the accidental is `#` or a lowercase
    /// `b`, and the octave is an optional `-` followed by digits, within
    /// [`MIN_OCTAVE`]..=[`MAX_OCTAVE`] (`C-1` is C in octave -1).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let mut chars = name.chars();

        let first = chars
            .next()
            .ok_or_else(|| SynthError::invalid_pitch(s, "empty note name"))?;
        let letter = Letter::from_char(first).ok_or_else(|| {
            SynthError::invalid_pitch(s, format!("letter must be A-G, got '{}'", first))
        })?;

        let rest = chars.as_str();
        let (accidental, octave_str) = if let Some(stripped) = rest.strip_prefix('#') {
            (Accidental::Sharp, stripped)
        } else if let Some(stripped) = rest.strip_prefix('b') {
            (Accidental::Flat, stripped)
        } else {
            (Accidental::Natural, rest)
        };

        if octave_str.is_empty() {
            return Err(SynthError::invalid_pitch(s, "missing octave"));
        }
        let digits = octave_str.strip_prefix('-').unwrap_or(octave_str);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SynthError::invalid_pitch(
                s,
                format!("octave must be an integer, got '{}'", octave_str),
            ));
        }
        let octave = octave_str
            .parse::<i32>()
            .ok()
            .filter(|octave| (MIN_OCTAVE..=MAX_OCTAVE).contains(octave))
            .ok_or_else(|| {
                SynthError::invalid_pitch(
                    s,
                    format!(
                        "octave must be between {} and {}, got '{}'",
                        MIN_OCTAVE, MAX_OCTAVE, octave_str
                    ),
                )
            })?;

        Ok(Pitch::new(letter, accidental, octave))
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
