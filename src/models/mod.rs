mod aggregate;
mod duration;
mod heartbeat;

pub use aggregate::Aggregate;
pub use duration::{Duration, ReadableDuration};
pub use heartbeat::{Heartbeat, HeartbeatField};
