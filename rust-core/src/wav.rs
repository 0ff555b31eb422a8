use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Samples decoded from a WAV file
pub struct Recording {
    /// Real samples, or interleaved I/Q for stereo files
    pub samples: Vec<f64>,
    pub sample_rate: f64,
    pub complex: bool,
}

/// Read a mono (real) or stereo (I/Q) WAV file, normalised to [-1, 1]
pub fn read_recording(path: &Path) -> Result<Recording> {
    let mut reader =
        WavReader::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let spec = reader.spec();

    let complex = match spec.channels {
        1 => false,
        2 => true,
        n => bail!("Expected mono or stereo (I/Q) WAV, got {} channels", n),
    };

    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(Recording {
        samples,
        sample_rate: spec.sample_rate as f64,
        complex,
    })
}
