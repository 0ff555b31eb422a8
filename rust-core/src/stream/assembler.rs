//! Frame assembly from arbitrarily sized pushes
//!
//! Samples are buffered as flat scalars. Complex streams store interleaved
//! I/Q pairs, so every length here is scaled by the values per sample.

/// Frame geometry in effect for one extraction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub fft_size: usize,
    pub overlap: usize,
    pub complex: bool,
}

impl FrameLayout {
    /// Scalars per sample (2 for I/Q)
    pub fn values_per_sample(&self) -> usize {
        if self.complex {
            2
        } else {
            1
        }
    }

    /// Frame length in buffered scalars
    pub fn frame_len(&self) -> usize {
        self.fft_size * self.values_per_sample()
    }

    /// Stride between frame starts in buffered scalars
    pub fn stride_len(&self) -> usize {
        (self.fft_size - self.overlap) * self.values_per_sample()
    }
}

/// Growable sample buffer for one stream
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<f64>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append samples to the buffer
    pub fn append(&mut self, samples: &[f64]) {
        self.buffer.extend_from_slice(samples);
    }

    /// Take every full frame available under `layout`, in order
    ///
    /// The consumed prefix is dropped up to the start of the next frame, so
    /// the overlapped tail and any remainder stay buffered for the next push.
    pub fn extract_ready_frames(&mut self, layout: FrameLayout) -> Vec<Vec<f64>> {
        let frame_len = layout.frame_len();
        let stride = layout.stride_len();
        if frame_len == 0 || stride == 0 {
            return Vec::new();
        }

        let mut frames = Vec::new();
        let mut start = 0;
        while start + frame_len <= self.buffer.len() {
            frames.push(self.buffer[start..start + frame_len].to_vec());
            start += stride;
        }

        // stride <= frame_len, so start never passes the end of the buffer
        self.buffer.drain(..start);
        frames
    }

    /// Drop everything buffered, returning the number of scalars dropped
    pub fn discard(&mut self) -> usize {
        let dropped = self.buffer.len();
        self.buffer.clear();
        dropped
    }

    /// Buffered scalars
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
