//! Output collaborators for the transform and power streams

use super::metadata::StreamMetadata;
use std::sync::{Arc, Mutex};

/// One event on an output stream
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Axis descriptor for the frames that follow
    Metadata(StreamMetadata),

    /// Frame payload: interleaved re/im for the transform output,
    /// real values for the power output
    Frame {
        stream_id: String,
        frame_id: u64,
        data: Vec<f64>,
    },

    /// Terminal marker; nothing follows for this stream id until it reopens
    EndOfStream { stream_id: String },
}

impl OutputEvent {
    pub fn stream_id(&self) -> &str {
        match self {
            OutputEvent::Metadata(meta) => &meta.stream_id,
            OutputEvent::Frame { stream_id, .. } => stream_id,
            OutputEvent::EndOfStream { stream_id } => stream_id,
        }
    }
}

/// Downstream consumer of one output stream
///
/// Events for one stream id arrive in order from a single session at a time.
/// Different stream ids may call in concurrently.
pub trait OutputSink: Send + Sync {
    fn push(&self, event: OutputEvent);
}

/// The two downstream sinks every session writes to
#[derive(Clone)]
pub struct Outputs {
    pub transform: Arc<dyn OutputSink>,
    pub power: Arc<dyn OutputSink>,
}

impl Outputs {
    pub fn new(transform: Arc<dyn OutputSink>, power: Arc<dyn OutputSink>) -> Self {
        Self { transform, power }
    }
}

/// Sink that records every event, in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<OutputEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<OutputEvent> {
        self.lock().clone()
    }

    /// Recorded events for one stream id
    pub fn events_for(&self, stream_id: &str) -> Vec<OutputEvent> {
        self.lock()
            .iter()
            .filter(|e| e.stream_id() == stream_id)
            .cloned()
            .collect()
    }

    /// Frame payloads for one stream id, with their frame ids
    pub fn frames_for(&self, stream_id: &str) -> Vec<(u64, Vec<f64>)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Frame {
                    stream_id: id,
                    frame_id,
                    data,
                } if id == stream_id => Some((*frame_id, data.clone())),
                _ => None,
            })
            .collect()
    }

    /// Remove and return all recorded events
    pub fn take(&self) -> Vec<OutputEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<OutputEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutputSink for CollectingSink {
    fn push(&self, event: OutputEvent) {
        self.lock().push(event);
    }
}
