//! Chord mixing integration tests: JSON chords, seeding and failure handling.

use plucker_core::rng::create_rng;
use plucker_core::{
    synthesize_chord, synthesize_chord_seeded, ChordSpec, DecaySpec, ExcitationSpec, Pitch,
    SynthConfig, SynthError, VoiceSpec,
};

fn pitch(name: &str) -> Pitch {
    name.parse().unwrap()
}

// ============================================================================
// JSON Chords
// ============================================================================

#[test]
fn test_json_chord_synthesizes() {
    let chord: ChordSpec = serde_json::from_str(
        r#"{
            "C3": {"gain": 1.0, "decay": {"alpha": 0.999}},
            "E4": 0.6,
            "G4": 0.6,
            "C5": {"gain": 0.4, "onset": 800}
        }"#,
    )
    .unwrap();
    let config = SynthConfig::default();
    let out = synthesize_chord_seeded(&chord, 8000, &config.decay(0.99), &config, 1).unwrap();
    assert_eq!(out.len(), 8000);
    assert!(out.peak() > 0.0);
}

#[test]
fn test_json_voice_with_explicit_excitation() {
    let chord: ChordSpec = serde_json::from_str(
        r#"{"A4": {"gain": 2.0, "excitation": {"type": "explicit", "samples": [1.0, 0.0]}}}"#,
    )
    .unwrap();
    let config = SynthConfig::default();
    let out = synthesize_chord(&chord, 6, &DecaySpec::undamped(), &config, &mut create_rng(0))
        .unwrap();
    assert_eq!(out.into_vec(), vec![2.0, 0.0, 2.0, 0.0, 2.0, 0.0]);
}

// ============================================================================
// Bass Sustain
// ============================================================================

#[test]
fn test_sustained_bass_outlasts_chord() {
    let config = SynthConfig::default();
    let chord = ChordSpec::new()
        .with_voice(pitch("C2"), VoiceSpec::with_gain(1.0).decay(config.decay(0.9999)))
        .with_voice(pitch("E4"), VoiceSpec::with_gain(1.0))
        .with_voice(pitch("G4"), VoiceSpec::with_gain(1.0));

    let decay = config.decay(0.9);
    let full = synthesize_chord_seeded(&chord, 16000, &decay, &config, 3).unwrap();

    let bass_only = ChordSpec::new()
        .with_voice(pitch("C2"), VoiceSpec::with_gain(1.0).decay(config.decay(0.9999)));
    let bass = synthesize_chord_seeded(&bass_only, 16000, &decay, &config, 3).unwrap();

    // By the last quarter second the upper voices are inaudible.
    let tail = 12000..16000;
    let diff: f64 = tail
        .map(|n| (full[n] - bass[n]).abs())
        .fold(0.0_f64, f64::max);
    assert!(diff < 1e-6, "upper voices still sounding: {}", diff);
    assert!(bass.as_slice()[12000..].iter().any(|s| s.abs() > 0.01));
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn test_zero_length_excitation_fails_chord() {
    let chord = ChordSpec::from_gains(&[("C4", 1.0)]).unwrap().with_voice(
        pitch("E4"),
        VoiceSpec::with_gain(1.0).excitation(ExcitationSpec::Noise {
            length: 0,
            distribution: Default::default(),
            seed: None,
        }),
    );
    let config = SynthConfig::default();
    let err =
        synthesize_chord(&chord, 100, &config.decay(0.99), &config, &mut create_rng(0)).unwrap_err();
    assert!(matches!(err, SynthError::InvalidBufferLength { .. }));
    assert!(err.to_string().contains("E4"));
}

#[test]
fn test_bad_config_fails_chord() {
    let config = SynthConfig::with_sample_rate(0);
    let chord = ChordSpec::from_gains(&[("C4", 1.0)]).unwrap();
    let err = synthesize_chord_seeded(&chord, 100, &DecaySpec::new(0.99), &config, 0).unwrap_err();
    assert!(matches!(err, SynthError::InvalidParameters { .. }));
}

#[test]
fn test_pitch_above_nyquist_still_plays() {
    // The delay line clamps to one sample rather than failing.
    let config = SynthConfig::with_sample_rate(8000);
    let chord = ChordSpec::from_gains(&[("C9", 1.0)]).unwrap();
    let out = synthesize_chord_seeded(&chord, 10, &config.decay(0.5), &config, 0).unwrap();
    assert_eq!(out.len(), 10);
}
