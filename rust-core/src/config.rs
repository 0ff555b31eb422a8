//! Processing parameters shared by every stream session
//!
//! Parameters can be built in code, loaded from a TOML file, or updated
//! one at a time through the [`SessionManager`](crate::stream::SessionManager).

use crate::error::{PsdError, Result};
use serde::Deserialize;
use std::path::Path;

/// PSD processing configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PsdConfig {
    /// Transform length in samples (real) or sample pairs (complex)
    pub fft_size: usize,

    /// Samples shared by consecutive frames (stride = fft_size - overlap)
    pub overlap: usize,

    /// Number of power frames averaged into one output frame
    pub num_average: usize,

    /// When positive, power values are emitted as `log_coefficient * log10(p)`
    pub log_coefficient: f64,

    /// Shift the frequency axis onto the RF reference frequency keyword
    pub rf_freq_units: bool,

    /// Emit transform payloads
    pub emit_fft: bool,

    /// Emit power payloads
    pub emit_psd: bool,
}

impl Default for PsdConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            overlap: 0,
            num_average: 1,
            log_coefficient: 0.0,
            rf_freq_units: false,
            emit_fft: true,
            emit_psd: true,
        }
    }
}

impl PsdConfig {
    /// Check the parameter combination without modifying anything
    pub fn validate(&self) -> Result<()> {
        if self.fft_size == 0 {
            return Err(PsdError::InvalidFftSize(self.fft_size));
        }
        if self.overlap >= self.fft_size {
            return Err(PsdError::InvalidOverlap {
                overlap: self.overlap,
                fft_size: self.fft_size,
            });
        }
        if self.num_average == 0 {
            return Err(PsdError::InvalidNumAverage);
        }
        Ok(())
    }

    /// Distance in samples between the starts of consecutive frames
    pub fn stride(&self) -> usize {
        self.fft_size - self.overlap
    }
}

/// Load and validate a configuration file
pub fn load_config(path: &Path) -> Result<PsdConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| PsdError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PsdConfig = toml::from_str(&content).map_err(|source| PsdError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
