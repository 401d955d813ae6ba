pub mod filters;
pub mod group;
pub mod rank;
pub mod readable;
pub mod sessions;

pub use filters::{from_last_seven_days, from_today, DateWindow};
pub use group::{aggregate_by, aggregate_by_field, aggregate_filtered, filter_heartbeats, group_by};
pub use rank::{top_n, top_origins};
pub use readable::{to_readable, to_readable_f64};
pub use sessions::{durations_from_times, heartbeats_to_durations};
