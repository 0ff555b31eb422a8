//! Stream session manager
//!
//! Owns the session table (stream id -> session) and the processing
//! parameters. The table lock is held only for lookup, insert and removal;
//! each session has its own lock held for the duration of one push, so
//! independent streams can be pushed from different threads.

use super::keywords::Keywords;
use super::session::{Packet, ParamSnapshot, SessionInfo, SessionState, StreamSession};
use super::sink::Outputs;
use crate::config::PsdConfig;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

type SessionHandle = Arc<Mutex<StreamSession>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SessionManager {
    params: RwLock<ParamSnapshot>,
    sessions: Mutex<HashMap<String, SessionHandle>>,
    outputs: Outputs,
}

impl SessionManager {
    /// Create a manager writing to `outputs`
    pub fn new(config: PsdConfig, outputs: Outputs) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            params: RwLock::new(ParamSnapshot {
                config,
                announce_epoch: 0,
            }),
            sessions: Mutex::new(HashMap::new()),
            outputs,
        })
    }

    /// Current parameters
    pub fn config(&self) -> PsdConfig {
        self.snapshot().config
    }

    /// Replace every parameter at once; rejected sets leave the old ones in place
    pub fn configure(&self, config: PsdConfig) -> Result<()> {
        self.update_config(|c| *c = config)
    }

    pub fn set_fft_size(&self, fft_size: usize) -> Result<()> {
        self.update_config(|c| c.fft_size = fft_size)
    }

    pub fn set_overlap(&self, overlap: usize) -> Result<()> {
        self.update_config(|c| c.overlap = overlap)
    }

    pub fn set_num_average(&self, num_average: usize) -> Result<()> {
        self.update_config(|c| c.num_average = num_average)
    }

    pub fn set_log_coefficient(&self, log_coefficient: f64) -> Result<()> {
        self.update_config(|c| c.log_coefficient = log_coefficient)
    }

    pub fn set_rf_freq_units(&self, enable: bool) -> Result<()> {
        self.update_config(|c| c.rf_freq_units = enable)
    }

    /// Enable or disable frame payloads per output
    pub fn set_outputs_enabled(&self, emit_fft: bool, emit_psd: bool) -> Result<()> {
        self.update_config(|c| {
            c.emit_fft = emit_fft;
            c.emit_psd = emit_psd;
        })
    }

    /// Make every session re-announce its metadata before its next frame
    pub fn force_metadata_update(&self) {
        let mut params = self.params.write().unwrap_or_else(PoisonError::into_inner);
        params.announce_epoch = params.announce_epoch.wrapping_add(1);
        log::trace!("Forcing metadata update (epoch {})", params.announce_epoch);
    }

    /// Route one push to its session, opening the session if needed
    ///
    /// Closed sessions stay in the table until their id is pushed again;
    /// that push replaces them with a fresh session (new buffer, frame ids
    /// restarting at 0).
    pub fn push(&self, packet: &Packet) -> Result<()> {
        loop {
            let handle = self.lookup_or_open(packet)?;
            let mut session = lock(&handle);

            if session.state() == SessionState::Closed {
                drop(session);
                self.evict(packet.stream_id, &handle);
                continue;
            }

            let params = self.snapshot();
            return session.push(packet, &params);
        }
    }

    /// Explicit metadata update without samples; opens the session if needed
    pub fn update_metadata(
        &self,
        stream_id: &str,
        sample_rate: f64,
        complex: bool,
        keywords: Keywords,
    ) -> Result<()> {
        let packet = Packet {
            stream_id,
            samples: &[],
            sample_rate,
            complex,
            end_of_stream: false,
            keywords: Some(keywords),
        };
        self.push(&packet)
    }

    /// Terminate a stream without new samples
    ///
    /// Unknown or already closed ids are a no-op with a warning.
    pub fn end_of_stream(&self, stream_id: &str) {
        let Some(handle) = self.lookup(stream_id) else {
            log::warn!("End of stream for unknown stream '{}', ignoring", stream_id);
            return;
        };

        let params = self.snapshot();
        lock(&handle).close(&params);
    }

    /// Tear a session down, discarding buffered samples and closing both outputs
    pub fn remove_stream(&self, stream_id: &str) -> bool {
        let removed = lock(&self.sessions).remove(stream_id);
        match removed {
            Some(handle) => {
                log::debug!("Removing stream '{}'", stream_id);
                self.close_if_active(&handle);
                true
            }
            None => false,
        }
    }

    /// Tear every session down
    pub fn shutdown(&self) {
        let drained: Vec<(String, SessionHandle)> = lock(&self.sessions).drain().collect();
        for (stream_id, handle) in drained {
            log::debug!("Shutting down stream '{}'", stream_id);
            self.close_if_active(&handle);
        }
    }

    /// Lifecycle state of a stream id
    pub fn state(&self, stream_id: &str) -> SessionState {
        self.lookup(stream_id)
            .map(|handle| lock(&handle).state())
            .unwrap_or(SessionState::Uninitialized)
    }

    pub fn session_info(&self, stream_id: &str) -> Option<SessionInfo> {
        self.lookup(stream_id).map(|handle| lock(&handle).info())
    }

    /// Ids of all sessions in the table, closed ones included
    pub fn stream_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        ids
    }

    fn snapshot(&self) -> ParamSnapshot {
        self.params.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update_config(&self, apply: impl FnOnce(&mut PsdConfig)) -> Result<()> {
        let mut params = self.params.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = params.config.clone();
        apply(&mut candidate);
        candidate.validate()?;

        if candidate != params.config {
            log::debug!("Parameters updated: {:?}", candidate);
            params.config = candidate;
        }
        Ok(())
    }

    fn lookup(&self, stream_id: &str) -> Option<SessionHandle> {
        lock(&self.sessions).get(stream_id).cloned()
    }

    fn lookup_or_open(&self, packet: &Packet) -> Result<SessionHandle> {
        if let Some(handle) = self.lookup(packet.stream_id) {
            return Ok(handle);
        }

        // Build outside the table lock; planning the FFT is not free
        let session = StreamSession::open(packet, &self.snapshot(), self.outputs.clone())?;
        let handle = Arc::new(Mutex::new(session));

        let mut sessions = lock(&self.sessions);
        let entry = sessions
            .entry(packet.stream_id.to_string())
            .or_insert_with(|| handle.clone());
        Ok(entry.clone())
    }

    /// Remove `handle` from the table if it is still the entry for `stream_id`
    fn evict(&self, stream_id: &str, handle: &SessionHandle) {
        let mut sessions = lock(&self.sessions);
        if sessions
            .get(stream_id)
            .is_some_and(|current| Arc::ptr_eq(current, handle))
        {
            sessions.remove(stream_id);
        }
    }

    fn close_if_active(&self, handle: &SessionHandle) {
        let mut session = lock(handle);
        if session.state() == SessionState::Active {
            session.close(&self.snapshot());
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
