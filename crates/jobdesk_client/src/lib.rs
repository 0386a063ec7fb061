//! Jobdesk client: typed HTTP access to the backend and the background
//! engine that executes requests and the applications poll timer.
mod backend;
mod engine;
mod poll;
mod types;

pub use backend::{Backend, ClientSettings, ReqwestBackend, DEFAULT_BASE_URL};
pub use engine::{EngineError, EngineHandle};
pub use poll::{run_poll_timer, ChannelEventSink, EventSink};
pub use types::{ClientError, EngineEvent, FailureKind, Operation};
