use crate::aggregation::group::aggregate_filtered;
use crate::error::EngineResult;
use crate::models::{Aggregate, Heartbeat, HeartbeatField};

/// The `limit` aggregates with the most total time, largest first.
///
/// Equal totals keep their input order. The input slice is left as is.
pub fn top_n<K: Clone>(aggregates: &[Aggregate<K>], limit: usize) -> Vec<Aggregate<K>> {
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked = aggregates.to_vec();
    ranked.sort_by(|a, b| b.total_time.cmp(&a.total_time));
    ranked.truncate(limit);
    ranked
}

/// Origins with the most active time among the heartbeats kept by `filter`.
pub fn top_origins<P>(
    heartbeats: &[Heartbeat],
    timeout_ms: i64,
    filter: P,
    limit: usize,
) -> EngineResult<Vec<Aggregate<String>>>
where
    P: FnMut(&Heartbeat, usize, &[Heartbeat]) -> bool,
{
    let aggregates = aggregate_filtered(heartbeats, timeout_ms, filter, HeartbeatField::Origin)?;
    Ok(top_n(&aggregates, limit))
}
