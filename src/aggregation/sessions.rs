use log::trace;

use crate::error::{EngineError, EngineResult};
use crate::models::{Duration, Heartbeat};

pub(crate) fn check_timeout(timeout_ms: i64) -> EngineResult<()> {
    if timeout_ms < 0 {
        return Err(EngineError::invalid(format!(
            "timeout must be non-negative, got {timeout_ms}ms"
        )));
    }
    Ok(())
}

fn check_times(times: &[i64]) -> EngineResult<()> {
    match times.iter().find(|&&time| time < 0) {
        Some(time) => Err(EngineError::invalid(format!(
            "heartbeat time must be non-negative, got {time}"
        ))),
        None => Ok(()),
    }
}

/// Reconstruct activity spans from a heartbeat batch.
///
/// The batch may be unordered and may repeat timestamps; it is not modified.
/// Consecutive heartbeats (in time order) at most `timeout_ms` apart share a
/// span, so a run of small steps forms one span even when its total length
/// is far beyond the timeout.
pub fn heartbeats_to_durations(
    heartbeats: &[Heartbeat],
    timeout_ms: i64,
) -> EngineResult<Vec<Duration>> {
    durations_from_times(heartbeats.iter().map(|heartbeat| heartbeat.time), timeout_ms)
}

/// Same as [`heartbeats_to_durations`], driven by bare timestamps.
pub fn durations_from_times<I>(times: I, timeout_ms: i64) -> EngineResult<Vec<Duration>>
where
    I: IntoIterator<Item = i64>,
{
    check_timeout(timeout_ms)?;

    let mut times: Vec<i64> = times.into_iter().collect();
    check_times(&times)?;
    match times.as_slice() {
        [] => return Ok(Vec::new()),
        [only] => return Ok(vec![Duration::point(*only)]),
        _ => {}
    }

    times.sort_unstable();

    let mut durations: Vec<Duration> = Vec::new();
    let mut current = Duration::point(times[0]);
    let mut previous = times[0];

    for &time in &times[1..] {
        if time - previous <= timeout_ms {
            current.extend_to(time);
        } else {
            durations.push(current);
            current = Duration::point(time);
        }
        previous = time;
    }
    durations.push(current);

    trace!(
        "Reconstructed {} durations from {} heartbeats (timeout {}ms)",
        durations.len(),
        times.len(),
        timeout_ms
    );

    Ok(durations)
}

/// Sum of lengths over the spans reconstructed from `times`.
pub(crate) fn active_time<I>(times: I, timeout_ms: i64) -> EngineResult<i64>
where
    I: IntoIterator<Item = i64>,
{
    Ok(durations_from_times(times, timeout_ms)?
        .iter()
        .map(Duration::length)
        .sum())
}
