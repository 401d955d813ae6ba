//! Heartbeat capture decisions.
//!
//! The capture layer keeps its "last heartbeat" in an explicit
//! [`CaptureState`] instead of a global, so the throttling rule in
//! [`should_emit`] is a pure function of its inputs.

pub mod event;
pub mod state;

pub use event::{EventKind, PageSnapshot};
pub use state::{should_emit, CaptureState, CaptureStatus};
