//! PSD - streaming FFT and power spectral density engine
//!
//! Sample pushes are grouped per stream id into fixed-size frames, each frame
//! is transformed, and the transform and its power spectrum are written to two
//! downstream sinks together with axis metadata.

pub mod config;
pub mod error;
pub mod spectrum;
pub mod stream;

pub use config::{load_config, PsdConfig};
pub use error::{PsdError, Result};
pub use spectrum::FftEngine;
pub use stream::{
    CollectingSink, KeywordValue, Keywords, OutputEvent, OutputSink, Outputs, Packet, SessionInfo,
    SessionManager, SessionState, StreamMetadata, CHAN_RF, COL_RF,
};
