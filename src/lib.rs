pub mod aggregation;
pub mod capture;
pub mod chart;
mod cli;
pub mod error;
pub mod models;
pub mod settings;
pub mod store;
mod utils;

pub use aggregation::{
    aggregate_by, aggregate_by_field, aggregate_filtered, from_last_seven_days, from_today,
    heartbeats_to_durations, to_readable, top_n, top_origins, DateWindow,
};
pub use capture::{should_emit, CaptureState, PageSnapshot};
pub use error::{EngineError, EngineResult};
pub use models::{Aggregate, Duration, Heartbeat, HeartbeatField, ReadableDuration};
pub use store::{HeartbeatStore, MemoryHeartbeatStore};

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    cli::run(std::env::args_os())
}
