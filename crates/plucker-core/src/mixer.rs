//! Mono layer mixing with per-layer gain and start offset.
//!
//! Layers are summed sample by sample into a zero-initialized buffer of fixed
//! length. No normalization or clipping is applied.

use crate::buffer::SampleBuffer;

/// A single signal to be mixed.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Layer samples.
    pub samples: SampleBuffer,
    /// Linear gain applied while mixing.
    pub gain: f64,
    /// Number of samples before this layer starts.
    pub offset: usize,
}

impl Layer {
    /// Creates a layer starting at sample 0.
    pub fn new(samples: SampleBuffer, gain: f64) -> Self {
        Self {
            samples,
            gain,
            offset: 0,
        }
    }

    /// Sets the start offset in samples.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Accumulates layers into a fixed-length output.
#[derive(Debug, Default)]
pub struct Mixer {
    num_samples: usize,
    layers: Vec<Layer>,
}

impl Mixer {
    /// Creates a mixer producing `num_samples` samples.
    pub fn new(num_samples: usize) -> Self {
        Self {
            num_samples,
            layers: Vec::new(),
        }
    }

    /// Adds a layer to the mix.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Adds samples starting at sample 0.
    pub fn add(&mut self, samples: SampleBuffer, gain: f64) {
        self.add_layer(Layer::new(samples, gain));
    }

    /// Number of layers added so far.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Output length in samples.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Sums all layers in insertion order.
    ///
    /// Samples that would fall past the output length are dropped.
    pub fn mix(&self) -> SampleBuffer {
        let mut output = SampleBuffer::zeros(self.num_samples);
        for layer in &self.layers {
            output.add_scaled(&layer.samples, layer.gain, layer.offset);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_mix_is_silent() {
        let mixer = Mixer::new(100);
        let output = mixer.mix();
        assert_eq!(output.len(), 100);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_mix_single_layer_with_gain() {
        let mut mixer = Mixer::new(100);
        mixer.add(SampleBuffer::from_vec(vec![1.0; 100]), 0.5);

        let output = mixer.mix();
        assert!(output.iter().all(|&s| (s - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_mix_multiple_layers() {
        let mut mixer = Mixer::new(100);
        mixer.add(SampleBuffer::from_vec(vec![0.3; 100]), 1.0);
        mixer.add(SampleBuffer::from_vec(vec![0.2; 100]), 1.0);
        mixer.add(SampleBuffer::from_vec(vec![0.1; 100]), 1.0);
        assert_eq!(mixer.layer_count(), 3);

        let output = mixer.mix();
        assert!(output.iter().all(|&s| (s - 0.6).abs() < 1e-12));
    }

    #[test]
    fn test_mix_no_clipping() {
        let mut mixer = Mixer::new(4);
        mixer.add(SampleBuffer::from_vec(vec![1.0; 4]), 1.0);
        mixer.add(SampleBuffer::from_vec(vec![1.0; 4]), 1.0);
        assert_eq!(mixer.mix().into_vec(), vec![2.0; 4]);
    }

    #[test]
    fn test_mix_with_offset() {
        let mut mixer = Mixer::new(5);
        mixer.add_layer(Layer::new(SampleBuffer::from_vec(vec![1.0, 1.0]), 1.0).with_offset(2));
        assert_eq!(mixer.mix().into_vec(), vec![0.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_mix_longer_layer_is_cut() {
        let mut mixer = Mixer::new(3);
        mixer.add(SampleBuffer::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]), 1.0);
        assert_eq!(mixer.mix().into_vec(), vec![1.0, 2.0, 3.0]);
    }
}
