//! Decoded audio held in memory.

/// A mono sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Mono f64 samples.
    pub data: Vec<f64>,
    /// Native sample rate of the audio.
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(data: Vec<f64>, sample_rate: u32) -> Self {
        SampleBuffer { data, sample_rate }
    }

    /// Create from 16-bit signed PCM data.
    pub fn from_i16(pcm: &[i16], sample_rate: u32) -> Self {
        let data: Vec<f64> = pcm.iter().map(|&s| s as f64 / 32768.0).collect();
        SampleBuffer { data, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a sample with linear interpolation at a fractional position.
    pub fn read_interpolated(&self, position: f64) -> f64 {
        if self.data.is_empty() || position < 0.0 {
            return 0.0;
        }

        let idx = position as usize;
        if idx >= self.data.len() - 1 {
            return if idx < self.data.len() {
                self.data[idx]
            } else {
                0.0
            };
        }

        let frac = position - idx as f64;
        self.data[idx] * (1.0 - frac) + self.data[idx + 1] * frac
    }

    /// Like `read_interpolated`, but the buffer is treated as one loop
    /// period: positions wrap in both directions and the last sample
    /// interpolates into the first.
    pub fn read_looped(&self, position: f64) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let len = self.data.len();
        let position = position.rem_euclid(len as f64);
        let idx = (position as usize).min(len - 1);
        let next = (idx + 1) % len;
        let frac = position - idx as f64;
        self.data[idx] * (1.0 - frac) + self.data[next] * frac
    }
}
