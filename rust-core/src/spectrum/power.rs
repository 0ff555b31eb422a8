//! Power spectrum from transform frames
//!
//! Power is the squared magnitude of each coefficient with no further
//! normalization, so `power[k] == re² + im²` of the emitted transform bin.

use num_complex::Complex64;

/// Number of power bins produced for a frame of `fft_size`
pub fn power_len(fft_size: usize, complex: bool) -> usize {
    if complex {
        fft_size
    } else {
        fft_size / 2
    }
}

/// Compute the power frame for a transform frame
///
/// Real-mode frames keep only the non-negative half (`fft_size / 2` bins);
/// complex-mode frames keep every bin in the centered order of the transform.
pub fn compute_power(transform: &[Complex64], complex: bool, out: &mut Vec<f64>) {
    let len = power_len(transform.len(), complex);
    out.clear();
    out.extend(transform[..len].iter().map(|c| c.re * c.re + c.im * c.im));
}

/// Scale power values to `coefficient * log10(p)` in place
pub fn apply_log_scale(power: &mut [f64], coefficient: f64) {
    for p in power.iter_mut() {
        *p = coefficient * p.log10();
    }
}

/// Element-wise running mean over a fixed number of power frames
#[derive(Debug, Clone)]
pub struct PowerAverager {
    target: usize,
    count: usize,
    sum: Vec<f64>,
}

impl PowerAverager {
    /// Create an averager emitting one frame per `target` inputs
    pub fn new(target: usize) -> Self {
        Self {
            target: target.max(1),
            count: 0,
            sum: Vec::new(),
        }
    }

    /// Accumulate one frame; returns the mean once `target` frames are in
    pub fn push(&mut self, power: &[f64]) -> Option<Vec<f64>> {
        if self.target == 1 {
            return Some(power.to_vec());
        }
        if self.sum.len() != power.len() {
            // Shape changed underneath us, start over
            self.sum = vec![0.0; power.len()];
            self.count = 0;
        }

        for (acc, &p) in self.sum.iter_mut().zip(power) {
            *acc += p;
        }
        self.count += 1;

        if self.count < self.target {
            return None;
        }

        let scale = 1.0 / self.target as f64;
        let mean = self.sum.iter().map(|&s| s * scale).collect();
        self.sum.iter_mut().for_each(|s| *s = 0.0);
        self.count = 0;
        Some(mean)
    }

    /// Drop any partially accumulated frames
    pub fn reset(&mut self) {
        self.count = 0;
        self.sum.clear();
    }

    /// Change the averaging count (clears the accumulator)
    pub fn set_target(&mut self, target: usize) {
        self.target = target.max(1);
        self.reset();
    }

    /// Frames accumulated towards the next output
    pub fn pending(&self) -> usize {
        self.count
    }
}
