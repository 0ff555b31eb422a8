//! Per-stream sessions and the manager that routes pushes to them

pub mod assembler;
pub mod keywords;
pub mod manager;
pub mod metadata;
pub mod session;
pub mod sink;

pub use keywords::{KeywordValue, Keywords, CHAN_RF, COL_RF};
pub use manager::SessionManager;
pub use metadata::StreamMetadata;
pub use session::{Packet, SessionInfo, SessionState};
pub use sink::{CollectingSink, OutputEvent, OutputSink, Outputs};
