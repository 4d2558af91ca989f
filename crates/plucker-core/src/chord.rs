//! Chord synthesis: one Karplus-Strong voice per pitch, summed.
//!
//! A [`ChordSpec`] maps validated pitches to [`VoiceSpec`]s. Every voice is
//! validated before any synthesis runs, so an invalid voice fails the whole
//! chord instead of silently dropping out of the mix.

use std::collections::btree_map;
use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;
use crate::config::SynthConfig;
use crate::error::{SynthError, SynthResult};
use crate::excitation::{generate_excitation, ExcitationSpec, NoiseDistribution};
use crate::mixer::{Layer, Mixer};
use crate::note::{buffer_length, Pitch};
use crate::oscillator::{check_output_length, synthesize, DecaySpec};
use crate::rng::create_voice_rng;

fn default_gain() -> f64 {
    1.0
}

/// Parameters of one chord voice.
///
/// In JSON a voice is either a full object or just its gain:
/// `{"C4": 1.0, "G2": {"gain": 0.8, "decay": {"alpha": 0.999}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VoiceEntry")]
pub struct VoiceSpec {
    /// Excitation override; by default one period of uniform noise at the
    /// voice's pitch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excitation: Option<ExcitationSpec>,
    /// Linear gain applied before summing.
    pub gain: f64,
    /// Decay override; the chord default applies when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay: Option<DecaySpec>,
    /// Samples of silence before the voice starts.
    pub onset: usize,
}

impl Default for VoiceSpec {
    fn default() -> Self {
        Self::with_gain(default_gain())
    }
}

impl VoiceSpec {
    /// A voice with the given gain and no overrides.
    pub fn with_gain(gain: f64) -> Self {
        Self {
            excitation: None,
            gain,
            decay: None,
            onset: 0,
        }
    }

    /// Sets the excitation.
    pub fn excitation(mut self, excitation: ExcitationSpec) -> Self {
        self.excitation = Some(excitation);
        self
    }

    /// Sets the decay override.
    pub fn decay(mut self, decay: DecaySpec) -> Self {
        self.decay = Some(decay);
        self
    }

    /// Sets the onset in samples.
    pub fn onset(mut self, onset: usize) -> Self {
        self.onset = onset;
        self
    }

    /// Decay this voice uses given the chord default.
    pub fn effective_decay(&self, default_decay: &DecaySpec) -> DecaySpec {
        self.decay.unwrap_or(*default_decay)
    }

    /// Excitation this voice uses at `pitch`.
    pub fn effective_excitation(
        &self,
        pitch: &Pitch,
        config: &SynthConfig,
    ) -> SynthResult<ExcitationSpec> {
        match &self.excitation {
            Some(spec) => Ok(spec.clone()),
            None => ExcitationSpec::noise_for_frequency(
                pitch.frequency(config),
                config.sample_rate,
                NoiseDistribution::Uniform,
            ),
        }
    }

    fn validate(
        &self,
        pitch: &Pitch,
        default_decay: &DecaySpec,
        config: &SynthConfig,
    ) -> SynthResult<()> {
        if !self.gain.is_finite() {
            return Err(SynthError::invalid_param(
                "gain",
                format!("must be finite, got {}", self.gain),
            ));
        }
        self.effective_decay(default_decay).validate()?;
        match &self.excitation {
            Some(spec) => spec.validate(),
            None => buffer_length(pitch.frequency(config), config.sample_rate).map(|_| ()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VoiceEntry {
    Gain(f64),
    Full(VoiceFields),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VoiceFields {
    #[serde(default)]
    excitation: Option<ExcitationSpec>,
    #[serde(default = "default_gain")]
    gain: f64,
    #[serde(default)]
    decay: Option<DecaySpec>,
    #[serde(default)]
    onset: usize,
}

impl From<VoiceEntry> for VoiceSpec {
    fn from(entry: VoiceEntry) -> Self {
        match entry {
            VoiceEntry::Gain(gain) => VoiceSpec::with_gain(gain),
            VoiceEntry::Full(fields) => VoiceSpec {
                excitation: fields.excitation,
                gain: fields.gain,
                decay: fields.decay,
                onset: fields.onset,
            },
        }
    }
}

/// A set of simultaneously sounding pitches.
///
/// Keys are parsed [`Pitch`] values, so note names are validated once when
/// the chord is built. Iteration runs from the lowest pitch upwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordSpec {
    voices: BTreeMap<Pitch, VoiceSpec>,
}

impl ChordSpec {
    /// Creates an empty (silent) chord.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chord from note names and gains.
    ///
    /// # Errors
    /// `InvalidPitch` for the first malformed note name.
    pub fn from_gains<S: AsRef<str>>(notes: &[(S, f64)]) -> SynthResult<Self> {
        let mut chord = Self::new();
        for (name, gain) in notes {
            let pitch: Pitch = name.as_ref().parse()?;
            chord.insert(pitch, VoiceSpec::with_gain(*gain));
        }
        Ok(chord)
    }

    /// Adds or replaces the voice at `pitch`, returning the previous one.
    pub fn insert(&mut self, pitch: Pitch, voice: VoiceSpec) -> Option<VoiceSpec> {
        self.voices.insert(pitch, voice)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_voice(mut self, pitch: Pitch, voice: VoiceSpec) -> Self {
        self.insert(pitch, voice);
        self
    }

    /// Voice at `pitch`, if any.
    pub fn get(&self, pitch: &Pitch) -> Option<&VoiceSpec> {
        self.voices.get(pitch)
    }

    /// Number of voices.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Returns true for a silent chord.
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Iterates voices from the lowest pitch upwards.
    pub fn iter(&self) -> btree_map::Iter<'_, Pitch, VoiceSpec> {
        self.voices.iter()
    }

    /// Checks every voice (and the shared parameters) without synthesizing.
    ///
    /// # Errors
    /// The first invalid voice's error, naming the voice.
    pub fn validate(&self, default_decay: &DecaySpec, config: &SynthConfig) -> SynthResult<()> {
        config.validate()?;
        default_decay.validate()?;
        for (pitch, voice) in &self.voices {
            voice
                .validate(pitch, default_decay, config)
                .map_err(|e| e.in_voice(&pitch.to_string()))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ChordSpec {
    type Item = (&'a Pitch, &'a VoiceSpec);
    type IntoIter = btree_map::Iter<'a, Pitch, VoiceSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.voices.iter()
    }
}

impl FromIterator<(Pitch, VoiceSpec)> for ChordSpec {
    fn from_iter<I: IntoIterator<Item = (Pitch, VoiceSpec)>>(iter: I) -> Self {
        Self {
            voices: iter.into_iter().collect(),
        }
    }
}

/// Synthesizes one voice without gain or onset applied.
///
/// The result has `output_length - onset` samples (the part of the chord the
/// voice actually sounds in).
pub fn synthesize_voice<R: Rng + ?Sized>(
    pitch: &Pitch,
    voice: &VoiceSpec,
    output_length: usize,
    default_decay: &DecaySpec,
    config: &SynthConfig,
    rng: &mut R,
) -> SynthResult<SampleBuffer> {
    let spec = voice.effective_excitation(pitch, config)?;
    let excitation = generate_excitation(&spec, rng)?;
    let decay = voice.effective_decay(default_decay);
    let length = output_length.saturating_sub(voice.onset);

    tracing::debug!(
        pitch = %pitch,
        frequency = pitch.frequency(config),
        delay_length = excitation.len(),
        gain = voice.gain,
        alpha = decay.alpha,
        "synthesizing voice"
    );

    synthesize(&excitation, length, &decay)
}

/// Plucks a single note: noise excitation at the pitch's period, then the
/// feedback loop.
pub fn pluck<R: Rng + ?Sized>(
    pitch: &Pitch,
    output_length: usize,
    decay: &DecaySpec,
    config: &SynthConfig,
    rng: &mut R,
) -> SynthResult<SampleBuffer> {
    config.validate()?;
    decay.validate()?;
    synthesize_voice(pitch, &VoiceSpec::default(), output_length, decay, config, rng)
}

/// Synthesizes every voice of `chord` and sums them.
///
/// Voices run from the lowest pitch upwards, each drawing its unseeded noise
/// from `rng` in turn. Each voice is scaled by its gain and added at its
/// onset into a zeroed buffer of `output_length` samples. An empty chord
/// yields silence. The sum is not normalized or clipped.
///
/// # Errors
/// Any invalid voice fails the whole chord.
pub fn synthesize_chord<R: Rng + ?Sized>(
    chord: &ChordSpec,
    output_length: usize,
    default_decay: &DecaySpec,
    config: &SynthConfig,
    rng: &mut R,
) -> SynthResult<SampleBuffer> {
    chord.validate(default_decay, config)?;
    check_output_length(output_length)?;

    let mut mixer = Mixer::new(output_length);
    for (pitch, voice) in chord {
        let samples = synthesize_voice(pitch, voice, output_length, default_decay, config, rng)
            .map_err(|e| e.in_voice(&pitch.to_string()))?;
        mixer.add_layer(Layer::new(samples, voice.gain).with_offset(voice.onset));
    }

    tracing::debug!(voices = chord.len(), output_length, "mixed chord");
    Ok(mixer.mix())
}

/// Like [`synthesize_chord`], giving each voice its own PCG32 stream derived
/// from `seed` and the voice's position in the chord.
///
/// A voice's noise therefore depends only on the seed and its index, not on
/// how much noise the other voices consumed.
pub fn synthesize_chord_seeded(
    chord: &ChordSpec,
    output_length: usize,
    default_decay: &DecaySpec,
    config: &SynthConfig,
    seed: u32,
) -> SynthResult<SampleBuffer> {
    chord.validate(default_decay, config)?;
    check_output_length(output_length)?;

    let mut mixer = Mixer::new(output_length);
    for (index, (pitch, voice)) in chord.iter().enumerate() {
        let mut rng = create_voice_rng(seed, index as u32);
        let samples = synthesize_voice(pitch, voice, output_length, default_decay, config, &mut rng)
            .map_err(|e| e.in_voice(&pitch.to_string()))?;
        mixer.add_layer(Layer::new(samples, voice.gain).with_offset(voice.onset));
    }

    tracing::debug!(voices = chord.len(), output_length, seed, "mixed seeded chord");
    Ok(mixer.mix())
}

/// Parallel form of [`synthesize_chord_seeded`].
///
/// Voices render on the rayon pool into private buffers; the buffers are then
/// summed on the calling thread.
#[cfg(feature = "parallel")]
pub fn synthesize_chord_parallel(
    chord: &ChordSpec,
    output_length: usize,
    default_decay: &DecaySpec,
    config: &SynthConfig,
    seed: u32,
) -> SynthResult<SampleBuffer> {
    use rayon::prelude::*;

    chord.validate(default_decay, config)?;
    check_output_length(output_length)?;

    let voices: Vec<(usize, (&Pitch, &VoiceSpec))> = chord.iter().enumerate().collect();
    let layers = voices
        .into_par_iter()
        .map(|(index, (pitch, voice))| {
            let mut rng = create_voice_rng(seed, index as u32);
            synthesize_voice(pitch, voice, output_length, default_decay, config, &mut rng)
                .map(|samples| Layer::new(samples, voice.gain).with_offset(voice.onset))
                .map_err(|e| e.in_voice(&pitch.to_string()))
        })
        .collect::<SynthResult<Vec<Layer>>>()?;

    let mut mixer = Mixer::new(output_length);
    for layer in layers {
        mixer.add_layer(layer);
    }

    tracing::debug!(voices = chord.len(), output_length, seed, "mixed chord in parallel");
    Ok(mixer.mix())
}
