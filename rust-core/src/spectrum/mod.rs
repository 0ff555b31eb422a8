//! Spectral transform and power computation

pub mod fft;
pub mod power;

pub use fft::FftEngine;
pub use power::{compute_power, PowerAverager};
