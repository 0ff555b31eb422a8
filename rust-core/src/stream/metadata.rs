//! Frequency-axis metadata for the transform and power outputs
//!
//! The axis depends only on the session parameters passed in, so deriving it
//! twice from the same state gives bit-identical results.

use super::keywords::Keywords;
use crate::spectrum::power::power_len;

/// Frequency axis of one output frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// Bin spacing in Hz
    pub xdelta: f64,
    /// Frequency of bin 0 in Hz
    pub xstart: f64,
}

/// Session parameters the axis is derived from
#[derive(Debug, Clone, Copy)]
pub struct AxisInputs<'a> {
    pub sample_rate: f64,
    pub fft_size: usize,
    pub overlap: usize,
    pub num_average: usize,
    pub complex: bool,
    pub rf_freq_units: bool,
    pub keywords: &'a Keywords,
}

impl AxisInputs<'_> {
    /// Reference frequency used for the axis, if the convention applies
    pub fn applied_reference(&self) -> Option<f64> {
        if self.rf_freq_units {
            self.keywords.reference_frequency()
        } else {
            None
        }
    }
}

/// Derive `(xdelta, xstart)`
///
/// Real input starts at 0 Hz, or at `rf - fs/4` on the RF axis.
/// Complex input is centered with bin 0 at `-xdelta * (fft_size/2 - 1)`,
/// shifted by the reference frequency on the RF axis.
pub fn derive_axis(inputs: &AxisInputs) -> Axis {
    let xdelta = inputs.sample_rate / inputs.fft_size as f64;

    let if_start = if inputs.complex {
        -xdelta * ((inputs.fft_size / 2) as f64 - 1.0)
    } else {
        0.0
    };

    let xstart = match inputs.applied_reference() {
        Some(rf) if inputs.complex => rf + if_start,
        Some(rf) => rf - inputs.sample_rate / 4.0,
        None => if_start,
    };

    Axis { xdelta, xstart }
}

/// Metadata announcement for one output
#[derive(Debug, Clone, PartialEq)]
pub struct StreamMetadata {
    pub stream_id: String,
    /// Bin spacing in Hz
    pub xdelta: f64,
    /// Frequency of bin 0 in Hz
    pub xstart: f64,
    /// Seconds between consecutive output frames
    pub ydelta: f64,
    /// Elements per frame payload (complex values for the transform output)
    pub subsize: usize,
    /// Payload is interleaved complex
    pub complex: bool,
    /// Input-side keywords, passed through unchanged
    pub keywords: Keywords,
}

/// Announcements for both outputs, derived together so they always agree
#[derive(Debug, Clone, PartialEq)]
pub struct OutputMetadata {
    pub transform: StreamMetadata,
    pub power: StreamMetadata,
}

pub fn describe_outputs(stream_id: &str, inputs: &AxisInputs) -> OutputMetadata {
    let axis = derive_axis(inputs);
    let frame_period = (inputs.fft_size - inputs.overlap) as f64 / inputs.sample_rate;
    let power_period = if inputs.num_average > 1 {
        frame_period * inputs.num_average as f64
    } else {
        frame_period
    };

    let transform = StreamMetadata {
        stream_id: stream_id.to_string(),
        xdelta: axis.xdelta,
        xstart: axis.xstart,
        ydelta: frame_period,
        subsize: inputs.fft_size,
        complex: true,
        keywords: inputs.keywords.clone(),
    };
    let power = StreamMetadata {
        ydelta: power_period,
        subsize: power_len(inputs.fft_size, inputs.complex),
        complex: false,
        ..transform.clone()
    };

    OutputMetadata { transform, power }
}
