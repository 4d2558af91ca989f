//! Seeded noise sources for excitation buffers.
//!
//! A seeded pluck uses [`create_rng`] directly. A seeded chord gives voice `i`
//! (lowest pitch first) the stream [`create_voice_rng`]`(seed, i)`, so adding a
//! voice above the others, or changing how long one voice's delay line is,
//! leaves the lower voices' noise unchanged.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// PCG32 stream for a seeded noise excitation.
///
/// The seed fills both halves of the 64-bit PCG state seed.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Seed of the chord voice at `voice_index` in pitch order.
///
/// First four bytes of BLAKE3 over `base_seed ++ voice_index`, little-endian.
pub fn derive_voice_seed(base_seed: u32, voice_index: u32) -> u32 {
    let mut input = Vec::with_capacity(8);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&voice_index.to_le_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Noise stream used by `synthesize_chord_seeded` and
/// `synthesize_chord_parallel` for one voice.
pub fn create_voice_rng(base_seed: u32, voice_index: u32) -> Pcg32 {
    create_rng(derive_voice_seed(base_seed, voice_index))
}
