//! Fixed-length sample buffers and the signal measurements used to check them.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// An owned, fixed-length sequence of samples. Index 0 is the first sample in
/// time.
///
/// The length is set at construction; every operation either works in place
/// on the existing samples or returns a new buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleBuffer {
    samples: Vec<f64>,
}

impl SampleBuffer {
    /// Creates a silent buffer of `len` samples.
    pub fn zeros(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    /// Wraps existing samples.
    pub fn from_vec(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrows the samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the buffer, returning the samples.
    pub fn into_vec(self) -> Vec<f64> {
        self.samples
    }

    /// Iterates over the samples.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.samples.iter()
    }

    /// Returns the first `len` samples, or the whole buffer if it is shorter.
    pub fn truncated(&self, len: usize) -> Self {
        let end = len.min(self.samples.len());
        Self::from_vec(self.samples[..end].to_vec())
    }

    /// Accumulates `other * gain` into this buffer, starting at `offset`.
    ///
    /// Samples of `other` that would land past the end are dropped; the
    /// length of `self` never changes.
    pub fn add_scaled(&mut self, other: &SampleBuffer, gain: f64, offset: usize) {
        if offset >= self.samples.len() {
            return;
        }
        for (out, &sample) in self.samples[offset..].iter_mut().zip(other.samples.iter()) {
            *out += sample * gain;
        }
    }

    /// Returns a copy with every sample multiplied by `gain`.
    pub fn scaled(&self, gain: f64) -> Self {
        Self::from_vec(self.samples.iter().map(|s| s * gain).collect())
    }

    /// Largest absolute sample value (0 for an empty buffer).
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
    }

    /// Root mean square level (0 for an empty buffer).
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f64).sqrt()
    }

    /// Peak absolute value of each consecutive block of `block_size` samples.
    ///
    /// The last block may be shorter. A block size of 0 yields no blocks.
    pub fn block_envelope(&self, block_size: usize) -> Vec<f64> {
        if block_size == 0 {
            return Vec::new();
        }
        self.samples
            .chunks(block_size)
            .map(|block| block.iter().map(|s| s.abs()).fold(0.0_f64, f64::max))
            .collect()
    }

    /// Checks `y[n] == y[n + period]` (within `tolerance`) for all
    /// `n >= start` where `n + period` is in range.
    pub fn is_periodic(&self, period: usize, start: usize, tolerance: f64) -> bool {
        if period == 0 {
            return false;
        }
        (start..self.samples.len().saturating_sub(period))
            .all(|n| (self.samples[n] - self.samples[n + period]).abs() <= tolerance)
    }

    /// Returns a copy scaled so that its peak equals `target_peak`.
    ///
    /// Silent buffers are returned unchanged. Peak management belongs to
    /// whatever renders the audio; synthesis and mixing never call this.
    pub fn normalized(&self, target_peak: f64) -> Self {
        let peak = self.peak();
        if peak > 0.0 {
            self.scaled(target_peak / peak)
        } else {
            self.clone()
        }
    }
}

impl From<Vec<f64>> for SampleBuffer {
    fn from(samples: Vec<f64>) -> Self {
        Self::from_vec(samples)
    }
}

impl From<SampleBuffer> for Vec<f64> {
    fn from(buffer: SampleBuffer) -> Self {
        buffer.samples
    }
}

impl FromIterator<f64> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for SampleBuffer {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.samples[index]
    }
}

impl AsRef<[f64]> for SampleBuffer {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

impl<'a> IntoIterator for &'a SampleBuffer {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
