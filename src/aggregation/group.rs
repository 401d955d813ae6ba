use std::collections::HashMap;
use std::hash::Hash;

use log::debug;

use crate::aggregation::sessions::{active_time, check_timeout};
use crate::error::EngineResult;
use crate::models::{Aggregate, Heartbeat, HeartbeatField};

/// Partition heartbeats by an extracted key.
///
/// Groups are returned in order of each key's first appearance and keep the
/// input order of their members.
pub fn group_by<K, F>(heartbeats: &[Heartbeat], key: F) -> Vec<(K, Vec<&Heartbeat>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Heartbeat) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&Heartbeat>)> = Vec::new();

    for heartbeat in heartbeats {
        let value = key(heartbeat);
        match positions.get(&value) {
            Some(&index) => groups[index].1.push(heartbeat),
            None => {
                positions.insert(value.clone(), groups.len());
                groups.push((value, vec![heartbeat]));
            }
        }
    }

    groups
}

/// Keep heartbeats for which `predicate(heartbeat, index, all)` holds.
///
/// Filtering happens before any session reconstruction, so the gaps seen
/// by the reconstruction are the gaps between retained heartbeats only.
pub fn filter_heartbeats<P>(heartbeats: &[Heartbeat], mut predicate: P) -> Vec<Heartbeat>
where
    P: FnMut(&Heartbeat, usize, &[Heartbeat]) -> bool,
{
    heartbeats
        .iter()
        .enumerate()
        .filter(|(index, heartbeat)| predicate(*heartbeat, *index, heartbeats))
        .map(|(_, heartbeat)| heartbeat.clone())
        .collect()
}

/// Total active time per key.
pub fn aggregate_by<K, F>(
    heartbeats: &[Heartbeat],
    timeout_ms: i64,
    key: F,
) -> EngineResult<Vec<Aggregate<K>>>
where
    K: Eq + Hash + Clone,
    F: Fn(&Heartbeat) -> K,
{
    check_timeout(timeout_ms)?;

    let aggregates = group_by(heartbeats, key)
        .into_iter()
        .map(|(value, members)| {
            let total = active_time(members.iter().map(|heartbeat| heartbeat.time), timeout_ms)?;
            Ok(Aggregate::new(value, total))
        })
        .collect::<EngineResult<Vec<_>>>()?;

    debug!(
        "Aggregated {} heartbeats into {} groups",
        heartbeats.len(),
        aggregates.len()
    );

    Ok(aggregates)
}

/// Total active time per value of a heartbeat field.
pub fn aggregate_by_field(
    heartbeats: &[Heartbeat],
    timeout_ms: i64,
    field: HeartbeatField,
) -> EngineResult<Vec<Aggregate<String>>> {
    aggregate_by(heartbeats, timeout_ms, |heartbeat| {
        field.value(heartbeat).to_string()
    })
}

/// Filter, then aggregate by field.
pub fn aggregate_filtered<P>(
    heartbeats: &[Heartbeat],
    timeout_ms: i64,
    predicate: P,
    field: HeartbeatField,
) -> EngineResult<Vec<Aggregate<String>>>
where
    P: FnMut(&Heartbeat, usize, &[Heartbeat]) -> bool,
{
    let retained = filter_heartbeats(heartbeats, predicate);
    aggregate_by_field(&retained, timeout_ms, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn beat(time: i64, origin: &str) -> Heartbeat {
        Heartbeat::new("scroll", time, origin, "/", "")
    }

    #[test]
    fn test_group_by_first_appearance() {
        let batch = [beat(3, "b"), beat(1, "a"), beat(2, "b")];
        let groups = group_by(&batch, |h| h.origin.clone());

        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[1].time, 2);
    }

    #[test]
    fn test_empty_batch_aggregates_to_nothing() {
        let aggregates = aggregate_by_field(&[], 60_000, HeartbeatField::Origin).unwrap();
        assert!(aggregates.is_empty());
    }

    #[test]
    fn test_aggregate_per_origin() {
        let batch = [
            beat(0, "a"),
            beat(10_000, "b"),
            beat(30_000, "a"),
            beat(200_000, "a"),
            beat(25_000, "b"),
        ];
        let aggregates = aggregate_by_field(&batch, 60_000, HeartbeatField::Origin).unwrap();

        assert_eq!(
            aggregates,
            vec![Aggregate::new("a".to_string(), 30_000), Aggregate::new("b".to_string(), 15_000)]
        );
    }

    #[test]
    fn test_groups_are_reconstructed_independently() {
        // Interleaved origins do not break each other's sessions.
        let batch = [beat(0, "a"), beat(40_000, "b"), beat(50_000, "a")];
        let aggregates = aggregate_by_field(&batch, 60_000, HeartbeatField::Origin).unwrap();
        assert_eq!(aggregates[0].total_time, 50_000);
        assert_eq!(aggregates[1].total_time, 0);
    }

    #[test]
    fn test_missing_key_forms_its_own_group() {
        let batch = [beat(0, ""), beat(1_000, "a"), beat(2_000, "")];
        let aggregates = aggregate_by_field(&batch, 60_000, HeartbeatField::Origin).unwrap();

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0], Aggregate::new(String::new(), 2_000));
    }

    #[test]
    fn test_filter_runs_before_reconstruction() {
        let batch = [
            beat(0, "a"),
            Heartbeat::new("blur", 50_000, "a", "/", ""),
            beat(100_000, "a"),
        ];
        let unfiltered = aggregate_by_field(&batch, 60_000, HeartbeatField::Origin).unwrap();
        assert_eq!(unfiltered[0].total_time, 100_000);

        // Without the middle heartbeat the 100s gap exceeds the timeout.
        let filtered =
            aggregate_filtered(&batch, 60_000, |h, _, _| h.kind != "blur", HeartbeatField::Origin)
                .unwrap();
        assert_eq!(filtered, vec![Aggregate::new("a".to_string(), 0)]);

        let widened =
            aggregate_filtered(&batch, 100_000, |h, _, _| h.kind != "blur", HeartbeatField::Origin)
                .unwrap();
        assert_eq!(widened[0].total_time, 100_000);
    }

    #[test]
    fn test_unit_key_spans_whole_batch() {
        let batch = [beat(0, "a"), beat(50_000, "b"), beat(100_000, "a")];
        let all = aggregate_by(&batch, 60_000, |_| ()).unwrap();
        assert_eq!(all, vec![Aggregate::new((), 100_000)]);
    }

    #[test]
    fn test_filter_sees_index_and_batch() {
        let batch = [beat(0, "a"), beat(1, "a"), beat(2, "a")];
        let kept = filter_heartbeats(&batch, |_, index, all| index + 1 < all.len());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].time, 1);
    }

    #[test]
    fn test_negative_timeout_rejected_before_grouping() {
        let err = aggregate_by_field(&[], -1, HeartbeatField::Origin).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }
}
