use crate::error::{EngineError, EngineResult};
use crate::models::ReadableDuration;

const MS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Split a millisecond span into whole hours, minutes and seconds.
///
/// Sub-second remainders are truncated, so the parts always add back up to
/// `duration_ms / 1000`.
pub fn to_readable(duration_ms: i64) -> EngineResult<ReadableDuration> {
    if duration_ms < 0 {
        return Err(EngineError::invalid(format!(
            "duration must be non-negative, got {duration_ms}ms"
        )));
    }

    let total_seconds = (duration_ms / MS_PER_SECOND) as u64;
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds - hours * SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds - hours * SECONDS_PER_HOUR - minutes * SECONDS_PER_MINUTE;

    Ok(ReadableDuration {
        hours,
        minutes,
        seconds,
    })
}

/// Like [`to_readable`] for fractional millisecond values.
pub fn to_readable_f64(duration_ms: f64) -> EngineResult<ReadableDuration> {
    if !duration_ms.is_finite() {
        return Err(EngineError::invalid(format!(
            "duration must be finite, got {duration_ms}"
        )));
    }
    if duration_ms < 0.0 {
        return Err(EngineError::invalid(format!(
            "duration must be non-negative, got {duration_ms}ms"
        )));
    }
    // Saturates for values beyond i64::MAX.
    to_readable(duration_ms.trunc() as i64)
}
