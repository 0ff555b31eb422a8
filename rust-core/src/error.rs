//! Error type shared by the PSD core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PsdError {
    #[error("Invalid FFT size {0}: must be at least 1")]
    InvalidFftSize(usize),

    #[error("Invalid overlap {overlap}: must be smaller than the FFT size ({fft_size})")]
    InvalidOverlap { overlap: usize, fft_size: usize },

    #[error("Invalid averaging count: must be at least 1")]
    InvalidNumAverage,

    #[error("Stream '{stream_id}': complex push carries an odd number of values ({len})")]
    OddComplexLength { stream_id: String, len: usize },

    #[error("Stream '{stream_id}': push declares complex={got_complex} but the stream is complex={expected_complex}")]
    ModeMismatch {
        stream_id: String,
        expected_complex: bool,
        got_complex: bool,
    },

    #[error("Stream '{stream_id}': push declares sample rate {got} Hz but the stream runs at {expected} Hz")]
    SampleRateMismatch {
        stream_id: String,
        expected: f64,
        got: f64,
    },

    #[error("Stream '{stream_id}': invalid sample rate {rate}")]
    InvalidSampleRate { stream_id: String, rate: f64 },

    #[error("FFT processing failed: {0}")]
    Transform(String),

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, PsdError>;
