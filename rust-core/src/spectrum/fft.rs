//! FFT engine for real and complex analysis frames
//!
//! Real frames go through realfft and are expanded to the full spectrum by
//! conjugate symmetry. Complex frames go through rustfft and are rotated so
//! that bin 0 is the most negative frequency, `-(fft_size/2 - 1)` bins, and
//! the last bin is Nyquist.

use crate::error::{PsdError, Result};
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward transform for one fixed frame length
pub struct FftEngine {
    /// FFT size (number of samples or sample pairs)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Complex FFT processor
    c2c: Arc<dyn Fft<f64>>,

    /// Reusable real input buffer (realfft uses it as scratch)
    real_input: Vec<f64>,

    /// Reusable half spectrum (fft_size/2 + 1 bins)
    half_spectrum: Vec<Complex64>,

    /// Scratch space for the complex FFT
    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size, at least 1
    pub fn new(fft_size: usize) -> Self {
        let r2c = RealFftPlanner::<f64>::new().plan_fft_forward(fft_size);
        let c2c = FftPlanner::<f64>::new().plan_fft_forward(fft_size);

        let real_input = r2c.make_input_vec();
        let half_spectrum = r2c.make_output_vec();
        let scratch = vec![Complex64::new(0.0, 0.0); c2c.get_inplace_scratch_len()];

        Self {
            fft_size,
            r2c,
            c2c,
            real_input,
            half_spectrum,
            scratch,
        }
    }

    /// Transform one analysis frame into `out` (always `fft_size` coefficients)
    ///
    /// # Arguments
    /// * `frame` - `fft_size` real samples, or `2 * fft_size` interleaved I/Q values
    /// * `complex` - interpretation of `frame`
    pub fn transform(&mut self, frame: &[f64], complex: bool, out: &mut Vec<Complex64>) -> Result<()> {
        if complex {
            self.transform_complex(frame, out)
        } else {
            self.transform_real(frame, out)
        }
    }

    fn transform_real(&mut self, frame: &[f64], out: &mut Vec<Complex64>) -> Result<()> {
        let n = self.fft_size;
        if frame.len() != n {
            return Err(PsdError::Transform(format!(
                "real frame has {} samples, expected {}",
                frame.len(),
                n
            )));
        }

        self.real_input.copy_from_slice(frame);
        self.r2c
            .process(&mut self.real_input, &mut self.half_spectrum)
            .map_err(|e| PsdError::Transform(e.to_string()))?;

        // Upper half mirrors the lower half: X[n-k] = conj(X[k])
        out.clear();
        out.reserve(n);
        out.extend_from_slice(&self.half_spectrum);
        for k in self.half_spectrum.len()..n {
            out.push(self.half_spectrum[n - k].conj());
        }
        Ok(())
    }

    fn transform_complex(&mut self, frame: &[f64], out: &mut Vec<Complex64>) -> Result<()> {
        let n = self.fft_size;
        if frame.len() != 2 * n {
            return Err(PsdError::Transform(format!(
                "complex frame has {} values, expected {}",
                frame.len(),
                2 * n
            )));
        }

        out.clear();
        out.extend(frame.chunks_exact(2).map(|iq| Complex64::new(iq[0], iq[1])));
        self.c2c.process_with_scratch(out, &mut self.scratch);

        // Zero-frequency-centered: DC lands at index fft_size/2 - 1
        out.rotate_right((n / 2).saturating_sub(1));
        Ok(())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}
