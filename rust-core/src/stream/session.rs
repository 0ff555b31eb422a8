//! One stream session: buffering, per-frame pipeline and metadata state
//!
//! A session is driven by exactly one caller at a time (the manager holds its
//! lock for the whole push), so frames leave in arrival order and parameter
//! changes land between pushes, never inside one.

use super::assembler::{FrameAssembler, FrameLayout};
use super::keywords::Keywords;
use super::metadata::{describe_outputs, AxisInputs};
use super::sink::{OutputEvent, Outputs};
use crate::config::PsdConfig;
use crate::error::{PsdError, Result};
use crate::spectrum::power::{apply_log_scale, compute_power, PowerAverager};
use crate::spectrum::FftEngine;
use num_complex::Complex64;

/// Lifecycle of a stream id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session exists for the id
    Uninitialized,
    /// Accepting pushes
    Active,
    /// End of stream delivered; terminal
    Closed,
}

/// One input push
#[derive(Debug, Clone)]
pub struct Packet<'a> {
    pub stream_id: &'a str,
    /// Real samples, or interleaved I/Q values for complex streams
    pub samples: &'a [f64],
    pub sample_rate: f64,
    pub complex: bool,
    pub end_of_stream: bool,
    /// Metadata update carried with this push
    pub keywords: Option<Keywords>,
}

impl<'a> Packet<'a> {
    pub fn real(stream_id: &'a str, samples: &'a [f64], sample_rate: f64) -> Self {
        Self {
            stream_id,
            samples,
            sample_rate,
            complex: false,
            end_of_stream: false,
            keywords: None,
        }
    }

    pub fn complex(stream_id: &'a str, samples: &'a [f64], sample_rate: f64) -> Self {
        Self {
            complex: true,
            ..Self::real(stream_id, samples, sample_rate)
        }
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn with_end_of_stream(mut self) -> Self {
        self.end_of_stream = true;
        self
    }

    /// Checks that do not depend on any session state
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(PsdError::InvalidSampleRate {
                stream_id: self.stream_id.to_string(),
                rate: self.sample_rate,
            });
        }
        if self.complex && self.samples.len() % 2 != 0 {
            return Err(PsdError::OddComplexLength {
                stream_id: self.stream_id.to_string(),
                len: self.samples.len(),
            });
        }
        Ok(())
    }
}

/// Parameters as seen by a session at the start of a push
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    pub config: PsdConfig,
    /// Bumped to force every session to re-announce its metadata
    pub announce_epoch: u64,
}

/// Read-only view of a session for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub state: SessionState,
    pub sample_rate: f64,
    pub complex: bool,
    /// Buffered samples (pairs for complex streams)
    pub buffered_samples: usize,
    pub frames_emitted: u64,
    pub keywords: Keywords,
}

pub struct StreamSession {
    stream_id: String,
    state: SessionState,
    config: PsdConfig,
    announce_epoch: u64,
    sample_rate: f64,
    complex: bool,
    keywords: Keywords,
    assembler: FrameAssembler,
    engine: FftEngine,
    averager: PowerAverager,
    next_frame_id: u64,
    announce_pending: bool,
    transform_buf: Vec<Complex64>,
    power_buf: Vec<f64>,
    outputs: Outputs,
}

impl StreamSession {
    /// Open a session from the push (or metadata update) that first names it
    pub fn open(packet: &Packet, params: &ParamSnapshot, outputs: Outputs) -> Result<Self> {
        packet.validate()?;
        log::debug!(
            "Opening stream '{}' ({} Hz, complex={})",
            packet.stream_id,
            packet.sample_rate,
            packet.complex
        );

        Ok(Self {
            stream_id: packet.stream_id.to_string(),
            state: SessionState::Active,
            config: params.config.clone(),
            announce_epoch: params.announce_epoch,
            sample_rate: packet.sample_rate,
            complex: packet.complex,
            keywords: packet.keywords.clone().unwrap_or_default(),
            assembler: FrameAssembler::new(),
            engine: FftEngine::new(params.config.fft_size),
            averager: PowerAverager::new(params.config.num_average),
            next_frame_id: 0,
            announce_pending: true,
            transform_buf: Vec::new(),
            power_buf: Vec::new(),
            outputs,
        })
    }

    /// Append samples and emit every frame they complete
    ///
    /// A rejected push leaves the buffer and metadata untouched.
    pub fn push(&mut self, packet: &Packet, params: &ParamSnapshot) -> Result<()> {
        debug_assert_eq!(self.state, SessionState::Active);
        self.check_push(packet)?;

        self.sync_params(params);
        if let Some(keywords) = &packet.keywords {
            self.apply_metadata(packet.sample_rate, packet.complex, keywords);
        }

        self.assembler.append(packet.samples);
        self.process_ready_frames()?;

        if packet.end_of_stream {
            self.close(params);
        }
        Ok(())
    }

    /// Flush and terminate both outputs
    ///
    /// A partial frame left in the buffer is discarded, never zero-padded.
    pub fn close(&mut self, params: &ParamSnapshot) {
        if self.state == SessionState::Closed {
            log::warn!("Stream '{}' already closed, ignoring end of stream", self.stream_id);
            return;
        }
        self.sync_params(params);

        let dropped = self.assembler.discard();
        if dropped > 0 {
            log::debug!(
                "Stream '{}': discarding {} buffered values shorter than one frame",
                self.stream_id,
                dropped
            );
        }

        self.announce_if_pending();
        for sink in [&self.outputs.transform, &self.outputs.power] {
            sink.push(OutputEvent::EndOfStream {
                stream_id: self.stream_id.clone(),
            });
        }
        self.state = SessionState::Closed;
        log::debug!(
            "Closed stream '{}' after {} frame(s)",
            self.stream_id,
            self.next_frame_id
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            state: self.state,
            sample_rate: self.sample_rate,
            complex: self.complex,
            buffered_samples: self.assembler.len() / self.layout().values_per_sample(),
            frames_emitted: self.next_frame_id,
            keywords: self.keywords.clone(),
        }
    }

    fn check_push(&self, packet: &Packet) -> Result<()> {
        packet.validate()?;
        if packet.keywords.is_some() {
            // Explicit metadata update may change mode and rate
            return Ok(());
        }
        if packet.complex != self.complex {
            return Err(PsdError::ModeMismatch {
                stream_id: self.stream_id.clone(),
                expected_complex: self.complex,
                got_complex: packet.complex,
            });
        }
        if packet.sample_rate != self.sample_rate {
            return Err(PsdError::SampleRateMismatch {
                stream_id: self.stream_id.clone(),
                expected: self.sample_rate,
                got: packet.sample_rate,
            });
        }
        Ok(())
    }

    /// Bring the session in line with the manager's current parameters
    fn sync_params(&mut self, params: &ParamSnapshot) {
        if params.config != self.config {
            self.apply_config(&params.config);
        }
        if params.announce_epoch != self.announce_epoch {
            self.announce_epoch = params.announce_epoch;
            self.announce_pending = true;
        }
    }

    fn apply_config(&mut self, config: &PsdConfig) {
        let old = std::mem::replace(&mut self.config, config.clone());
        log::trace!("Stream '{}': parameters {:?} -> {:?}", self.stream_id, old, config);

        if old.fft_size != config.fft_size {
            self.engine = FftEngine::new(config.fft_size);
            self.averager.reset();
            self.announce_pending = true;
        }
        if old.num_average != config.num_average {
            self.averager.set_target(config.num_average);
            self.announce_pending = true;
        }
        if old.overlap != config.overlap || old.rf_freq_units != config.rf_freq_units {
            self.announce_pending = true;
        }
        if old.emit_psd && !config.emit_psd {
            self.averager.reset();
        }
    }

    fn apply_metadata(&mut self, sample_rate: f64, complex: bool, keywords: &Keywords) {
        if complex != self.complex {
            let dropped = self.assembler.discard();
            if dropped > 0 {
                log::warn!(
                    "Stream '{}': mode changed to complex={}, dropping {} buffered values",
                    self.stream_id,
                    complex,
                    dropped
                );
            }
            self.complex = complex;
            self.averager.reset();
            self.announce_pending = true;
        }
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.announce_pending = true;
        }
        // The update carries the complete current set
        if *keywords != self.keywords {
            self.keywords = keywords.clone();
            self.announce_pending = true;
        }
    }

    fn layout(&self) -> FrameLayout {
        FrameLayout {
            fft_size: self.config.fft_size,
            overlap: self.config.overlap,
            complex: self.complex,
        }
    }

    fn process_ready_frames(&mut self) -> Result<()> {
        let layout = self.layout();
        let frames = self.assembler.extract_ready_frames(layout);
        for frame in &frames {
            self.emit_frame(frame)?;
        }
        Ok(())
    }

    fn emit_frame(&mut self, frame: &[f64]) -> Result<()> {
        self.engine.transform(frame, self.complex, &mut self.transform_buf)?;
        self.announce_if_pending();

        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;

        if self.config.emit_fft {
            let data = self.transform_buf.iter().flat_map(|c| [c.re, c.im]).collect();
            self.outputs.transform.push(OutputEvent::Frame {
                stream_id: self.stream_id.clone(),
                frame_id,
                data,
            });
        }

        if self.config.emit_psd {
            compute_power(&self.transform_buf, self.complex, &mut self.power_buf);
            if let Some(mut data) = self.averager.push(&self.power_buf) {
                if self.config.log_coefficient > 0.0 {
                    apply_log_scale(&mut data, self.config.log_coefficient);
                }
                self.outputs.power.push(OutputEvent::Frame {
                    stream_id: self.stream_id.clone(),
                    frame_id,
                    data,
                });
            }
        }

        log::trace!("Stream '{}': emitted frame {}", self.stream_id, frame_id);
        Ok(())
    }

    fn announce_if_pending(&mut self) {
        if !self.announce_pending {
            return;
        }
        self.announce_pending = false;

        let inputs = AxisInputs {
            sample_rate: self.sample_rate,
            fft_size: self.config.fft_size,
            overlap: self.config.overlap,
            num_average: self.config.num_average,
            complex: self.complex,
            rf_freq_units: self.config.rf_freq_units,
            keywords: &self.keywords,
        };
        if inputs.rf_freq_units && self.keywords.reference_frequency().is_none() {
            log::warn!(
                "Stream '{}': RF frequency units requested but no CHAN_RF/COL_RF keyword present",
                self.stream_id
            );
        }

        let meta = describe_outputs(&self.stream_id, &inputs);
        log::debug!(
            "Stream '{}': announcing xdelta={} xstart={}",
            self.stream_id,
            meta.transform.xdelta,
            meta.transform.xstart
        );
        self.outputs.transform.push(OutputEvent::Metadata(meta.transform));
        self.outputs.power.push(OutputEvent::Metadata(meta.power));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::keywords::{CHAN_RF, COL_RF};
    use crate::stream::metadata::StreamMetadata;
    use crate::stream::sink::CollectingSink;
    use std::sync::Arc;

    fn sinks() -> (Arc<CollectingSink>, Arc<CollectingSink>, Outputs) {
        let transform = Arc::new(CollectingSink::new());
        let power = Arc::new(CollectingSink::new());
        let outputs = Outputs::new(transform.clone(), power.clone());
        (transform, power, outputs)
    }

    fn params(fft_size: usize) -> ParamSnapshot {
        ParamSnapshot {
            config: PsdConfig {
                fft_size,
                ..PsdConfig::default()
            },
            announce_epoch: 0,
        }
    }

    fn kinds(events: &[OutputEvent]) -> Vec<&'static str> {
        events
            .iter()
            .map(|e| match e {
                OutputEvent::Metadata(_) => "meta",
                OutputEvent::Frame { .. } => "frame",
                OutputEvent::EndOfStream { .. } => "eos",
            })
            .collect()
    }

    fn announcements(events: &[OutputEvent]) -> Vec<StreamMetadata> {
        events
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Metadata(meta) => Some(meta.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_first_frame_is_announced_once() {
        let (transform, power, outputs) = sinks();
        let p = params(8);
        let samples = [1.0; 8];
        let packet = Packet::real("s", &samples, 1000.0);

        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();
        session.push(&packet, &p).unwrap();

        assert_eq!(kinds(&transform.events()), vec!["meta", "frame", "frame"]);
        assert_eq!(kinds(&power.events()), vec!["meta", "frame", "frame"]);

        let frames = transform.frames_for("s");
        assert_eq!(frames[0].0, 0);
        assert_eq!(frames[1].0, 1);
        // 8 complex coefficients, interleaved
        assert_eq!(frames[0].1.len(), 16);
        assert_eq!(power.frames_for("s")[0].1.len(), 4);
    }

    #[test]
    fn test_end_of_stream_discards_partial_frame() {
        let (transform, power, outputs) = sinks();
        let p = params(8);
        let samples = [0.5; 5];
        let packet = Packet::real("s", &samples, 1000.0).with_end_of_stream();

        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(kinds(&transform.events()), vec!["meta", "eos"]);
        assert_eq!(kinds(&power.events()), vec!["meta", "eos"]);
    }

    #[test]
    fn test_second_close_is_noop() {
        let (transform, _power, outputs) = sinks();
        let p = params(8);
        let packet = Packet::real("s", &[], 1000.0);

        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.close(&p);
        session.close(&p);
        assert_eq!(kinds(&transform.events()), vec!["meta", "eos"]);
    }

    #[test]
    fn test_mode_mismatch_leaves_buffer_untouched() {
        let (_transform, _power, outputs) = sinks();
        let p = params(8);
        let samples = [1.0, 2.0, 3.0];
        let packet = Packet::real("s", &samples, 1000.0);

        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        let iq = [1.0, 0.0];
        let err = session.push(&Packet::complex("s", &iq, 1000.0), &p).unwrap_err();
        assert!(matches!(err, PsdError::ModeMismatch { .. }));

        let err = session.push(&Packet::real("s", &samples, 2000.0), &p).unwrap_err();
        assert!(matches!(err, PsdError::SampleRateMismatch { .. }));

        assert_eq!(session.info().buffered_samples, 3);
    }

    #[test]
    fn test_odd_complex_push_rejected() {
        let (_transform, _power, outputs) = sinks();
        let p = params(4);
        let iq = [1.0, 0.0, 1.0, 0.0];
        let packet = Packet::complex("s", &iq, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        let odd = [1.0, 0.0, 1.0];
        let err = session.push(&Packet::complex("s", &odd, 1000.0), &p).unwrap_err();
        assert!(matches!(err, PsdError::OddComplexLength { len: 3, .. }));
        assert_eq!(session.info().buffered_samples, 2);
    }

    #[test]
    fn test_metadata_update_switches_mode() {
        let (transform, _power, outputs) = sinks();
        let p = params(4);
        let samples = [1.0; 3];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        let iq = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let update = Packet::complex("s", &iq, 1000.0).with_keywords(Keywords::new());
        session.push(&update, &p).unwrap();

        let info = session.info();
        assert!(info.complex);
        assert_eq!(info.buffered_samples, 0);
        assert_eq!(kinds(&transform.events()), vec!["meta", "frame"]);
        match &transform.events()[0] {
            OutputEvent::Metadata(meta) => assert_eq!(meta.xstart, -250.0),
            other => panic!("expected metadata, got {:?}", other),
        }
    }

    #[test]
    fn test_parameter_change_applies_to_buffered_samples() {
        let (transform, _power, outputs) = sinks();
        let samples = [1.0; 4];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &params(8), outputs).unwrap();
        session.push(&packet, &params(8)).unwrap();
        assert!(transform.frames_for("s").is_empty());

        session.push(&Packet::real("s", &[], 1000.0), &params(4)).unwrap();
        let frames = transform.frames_for("s");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1.len(), 8);
        match &transform.events()[0] {
            OutputEvent::Metadata(meta) => assert_eq!(meta.xdelta, 250.0),
            other => panic!("expected metadata, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_change_reannounces() {
        let (transform, _power, outputs) = sinks();
        let mut p = params(4);
        p.config.rf_freq_units = true;
        let samples = [1.0; 4];
        let first = Packet::real("s", &samples, 1000.0).with_keywords(Keywords::new().with(CHAN_RF, 1e6));
        let mut session = StreamSession::open(&first, &p, outputs).unwrap();
        session.push(&first, &p).unwrap();

        let retune = Packet::real("s", &samples, 1000.0).with_keywords(Keywords::new().with(CHAN_RF, 2e6));
        session.push(&retune, &p).unwrap();

        let starts: Vec<f64> = transform
            .events()
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Metadata(meta) => Some(meta.xstart),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![1e6 - 250.0, 2e6 - 250.0]);
        assert_eq!(kinds(&transform.events()), vec!["meta", "frame", "meta", "frame"]);
    }

    #[test]
    fn test_keyword_update_replaces_previous_set() {
        let (transform, power, outputs) = sinks();
        let mut p = params(4);
        p.config.rf_freq_units = true;
        let iq = [1.0; 8];
        let first = Packet::complex("s", &iq, 1000.0)
            .with_keywords(Keywords::new().with(CHAN_RF, 1e8).with(COL_RF, 1e8));
        let mut session = StreamSession::open(&first, &p, outputs).unwrap();
        session.push(&first, &p).unwrap();

        // Channel tag dropped upstream; the collection tag now steers the axis
        let retune = Packet::complex("s", &iq, 1000.0).with_keywords(Keywords::new().with(COL_RF, 2e8));
        session.push(&retune, &p).unwrap();

        assert_eq!(kinds(&transform.events()), vec!["meta", "frame", "meta", "frame"]);
        for sink in [&transform, &power] {
            let meta = announcements(&sink.events());
            assert_eq!(meta[0].xstart, 1e8 - 250.0);
            assert_eq!(meta[1].xstart, 2e8 - 250.0);
            assert_eq!(meta[1].keywords.get(CHAN_RF), None);
            assert_eq!(meta[1].keywords.len(), 1);
        }
        assert_eq!(session.info().keywords, Keywords::new().with(COL_RF, 2e8));
    }

    #[test]
    fn test_sample_rate_update_after_first_frame_reannounces() {
        let (transform, power, outputs) = sinks();
        let p = params(4);
        let samples = [1.0; 4];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        let update = Packet::real("s", &samples, 2000.0).with_keywords(Keywords::new());
        session.push(&update, &p).unwrap();

        assert_eq!(kinds(&transform.events()), vec!["meta", "frame", "meta", "frame"]);
        assert_eq!(kinds(&power.events()), vec!["meta", "frame", "meta", "frame"]);
        let meta = announcements(&transform.events());
        assert_eq!((meta[0].xdelta, meta[1].xdelta), (250.0, 500.0));
        assert_eq!(meta[0].ydelta, 4.0 / 1000.0);
        assert_eq!(meta[1].ydelta, 4.0 / 2000.0);
        assert_eq!(session.info().sample_rate, 2000.0);
    }

    #[test]
    fn test_overlap_change_after_first_frame_reannounces() {
        let (transform, _power, outputs) = sinks();
        let mut p = params(4);
        let samples = [1.0; 4];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        p.config.overlap = 2;
        session.push(&packet, &p).unwrap();

        assert_eq!(kinds(&transform.events()), vec!["meta", "frame", "meta", "frame"]);
        let meta = announcements(&transform.events());
        assert_eq!(meta[1].xdelta, 250.0);
        assert_eq!(meta[0].ydelta, 4.0 / 1000.0);
        assert_eq!(meta[1].ydelta, 2.0 / 1000.0);
        // Stride 2 leaves the last two samples for the next frame
        assert_eq!(session.info().buffered_samples, 2);
    }

    #[test]
    fn test_num_average_change_after_first_frame_reannounces() {
        let (transform, power, outputs) = sinks();
        let mut p = params(4);
        let samples = [1.0; 4];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        p.config.num_average = 2;
        session.push(&Packet::real("s", &[1.0; 8], 1000.0), &p).unwrap();

        assert_eq!(kinds(&transform.events()), vec!["meta", "frame", "meta", "frame", "frame"]);
        assert_eq!(kinds(&power.events()), vec!["meta", "frame", "meta", "frame"]);

        let transform_meta = announcements(&transform.events());
        assert_eq!(transform_meta[1].ydelta, 4.0 / 1000.0);
        let power_meta = announcements(&power.events());
        assert_eq!(power_meta[0].ydelta, 4.0 / 1000.0);
        assert_eq!(power_meta[1].ydelta, 4.0 / 1000.0 * 2.0);
        assert_eq!(power.frames_for("s")[1].0, 2);
    }

    #[test]
    fn test_forced_announcement() {
        let (transform, _power, outputs) = sinks();
        let mut p = params(4);
        let samples = [1.0; 4];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        p.announce_epoch += 1;
        session.push(&packet, &p).unwrap();
        session.push(&packet, &p).unwrap();
        assert_eq!(
            kinds(&transform.events()),
            vec!["meta", "frame", "meta", "frame", "frame"]
        );
    }

    #[test]
    fn test_averaging_and_log_scale() {
        let (transform, power, outputs) = sinks();
        let mut p = params(4);
        p.config.num_average = 2;
        p.config.log_coefficient = 10.0;
        let samples = [1.0; 16];
        let packet = Packet::real("s", &samples, 1000.0);
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        assert_eq!(transform.frames_for("s").len(), 4);
        let frames = power.frames_for("s");
        assert_eq!(frames.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![1, 3]);
        // DC of a constant 1.0 frame is 4, power 16
        assert!((frames[0].1[0] - 10.0 * 16f64.log10()).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_output_still_terminates() {
        let (transform, power, outputs) = sinks();
        let mut p = params(4);
        p.config.emit_fft = false;
        let samples = [1.0; 4];
        let packet = Packet::real("s", &samples, 1000.0).with_end_of_stream();
        let mut session = StreamSession::open(&packet, &p, outputs).unwrap();
        session.push(&packet, &p).unwrap();

        assert_eq!(kinds(&transform.events()), vec!["meta", "eos"]);
        assert_eq!(kinds(&power.events()), vec!["meta", "frame", "eos"]);
    }

    #[test]
    fn test_invalid_sample_rate_rejected_on_open() {
        let (_t, _p, outputs) = sinks();
        let packet = Packet::real("s", &[], 0.0);
        assert!(matches!(
            StreamSession::open(&packet, &params(4), outputs),
            Err(PsdError::InvalidSampleRate { .. })
        ));
    }
}
