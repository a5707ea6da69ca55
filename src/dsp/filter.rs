//! Biquad filter — matches WebAudio BiquadFilterNode coefficients.

use std::f64::consts::PI;

use crate::backend::{FilterKind, FilterSpec};

/// A biquad IIR filter (2nd order).
///
/// Implements the standard Direct Form II Transposed structure.
/// Coefficient formulas from the Audio EQ Cookbook (Robert Bristow-Johnson),
/// with Q interpreted the way WebAudio does: in dB for low-pass, linear
/// for band-pass.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    pub kind: FilterKind,
    frequency: f64,
    q: f64,

    // Coefficients
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    // State (Direct Form II Transposed)
    z1: f64,
    z2: f64,

    sample_rate: f64,
    dirty: bool,
}

impl BiquadFilter {
    pub fn new(spec: FilterSpec, sample_rate: f64) -> Self {
        let mut f = BiquadFilter {
            kind: spec.kind,
            frequency: spec.frequency,
            q: spec.q,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
            sample_rate,
            dirty: true,
        };
        f.update_coefficients();
        f
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    /// Recompute filter coefficients from current parameters.
    pub fn update_coefficients(&mut self) {
        // WebAudio clamps the frequency to [0, nyquist].
        let nyquist = self.sample_rate / 2.0;
        let freq = self.frequency.clamp(0.0, nyquist);
        let w0 = 2.0 * PI * freq / self.sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();

        let (b0, b1, b2, a0, a1, a2) = match self.kind {
            FilterKind::Lowpass => {
                let alpha = sin_w0 / (2.0 * 10.0_f64.powf(self.q / 20.0));
                let b1 = 1.0 - cos_w0;
                let b0 = b1 / 2.0;
                let b2 = b0;
                let a0 = 1.0 + alpha;
                let a1 = -2.0 * cos_w0;
                let a2 = 1.0 - alpha;
                (b0, b1, b2, a0, a1, a2)
            }
            FilterKind::Bandpass => {
                let alpha = sin_w0 / (2.0 * self.q.max(1e-4));
                let b0 = alpha;
                let b1 = 0.0;
                let b2 = -alpha;
                let a0 = 1.0 + alpha;
                let a1 = -2.0 * cos_w0;
                let a2 = 1.0 - alpha;
                (b0, b1, b2, a0, a1, a2)
            }
        };

        // Normalize by a0
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
        self.dirty = false;
    }

    /// Process a single sample through the filter.
    pub fn process(&mut self, input: f64) -> f64 {
        if self.dirty {
            self.update_coefficients();
        }

        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Set frequency and mark coefficients dirty.
    pub fn set_frequency(&mut self, freq: f64) {
        self.frequency = freq;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak_response(filter: &mut BiquadFilter, freq: f64, sample_rate: f64) -> f64 {
        let mut max_out = 0.0_f64;
        for i in 0..(sample_rate as usize / 10) {
            let t = i as f64 / sample_rate;
            let out = filter.process((2.0 * PI * freq * t).sin());
            if i > 1000 {
                // skip transient
                max_out = max_out.max(out.abs());
            }
        }
        max_out
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut f = BiquadFilter::new(FilterSpec::lowpass(1000.0), 44100.0);

        // Feed DC signal (1.0) — should converge to 1.0
        let mut output = 0.0;
        for _ in 0..2000 {
            output = f.process(1.0);
        }
        assert!(
            (output - 1.0).abs() < 0.001,
            "Lowpass should pass DC, got {output}"
        );
    }

    #[test]
    fn bandpass_blocks_dc() {
        let mut f = BiquadFilter::new(FilterSpec::bandpass(1000.0, 10.0), 44100.0);

        let mut output = 0.0;
        for _ in 0..20000 {
            output = f.process(1.0);
        }
        assert!(output.abs() < 0.001, "Bandpass should block DC, got {output}");
    }

    #[test]
    fn lowpass_attenuates_high_freq() {
        let mut f = BiquadFilter::new(FilterSpec::lowpass(1000.0), 44100.0);
        let max_out = peak_response(&mut f, 15000.0, 44100.0);
        assert!(
            max_out < 0.01,
            "Lowpass@1kHz should strongly attenuate 15kHz, got amplitude {max_out}"
        );
    }

    #[test]
    fn bandpass_passes_center_and_moves_with_frequency() {
        let sr = 44100.0;
        let mut f = BiquadFilter::new(FilterSpec::bandpass(1000.0, 10.0), sr);
        let at_center = peak_response(&mut f, 1000.0, sr);
        assert!(at_center > 0.9, "center gain {at_center}");

        let mut f = BiquadFilter::new(FilterSpec::bandpass(1000.0, 10.0), sr);
        f.set_frequency(2000.0);
        let off_center = peak_response(&mut f, 1000.0, sr);
        assert!(off_center < 0.2, "1kHz through a 2kHz band-pass: {off_center}");
        assert_eq!(f.frequency(), 2000.0);
    }

    #[test]
    fn filter_output_finite_above_nyquist() {
        let mut f = BiquadFilter::new(FilterSpec::bandpass(40000.0, 10.0), 44100.0);

        for i in 0..10000 {
            let input = if i % 100 == 0 { 1.0 } else { 0.0 };
            let out = f.process(input);
            assert!(out.is_finite(), "Filter output not finite at sample {i}");
        }
    }
}
