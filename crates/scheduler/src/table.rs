//! ScheduleTable - time-bucketed pending lines
//!
//! Maps absolute unix seconds to the lines due at that instant. Buckets are
//! created lazily on insert and removed whole when detached, so a spec
//! lives in exactly one bucket at any time outside a tick's pop/reinsert.

use std::collections::BTreeMap;

use chrono::{NaiveTime, TimeZone, Utc};
use chrono_tz::America::Los_Angeles;
use contracts::{ContractError, LineSpec};
use tracing::{debug, info};

/// Reference timezone for interpreting `HH:MM:SS` start times
const START_TIME_FORMAT: &str = "%H:%M:%S";

/// Time-bucketed collection of pending line specs
#[derive(Debug, Default)]
pub struct ScheduleTable {
    buckets: BTreeMap<i64, Vec<LineSpec>>,
}

impl ScheduleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial table from normalized specs and the ticker epoch.
    ///
    /// Placement policy per line:
    /// - no start time: bucket at `ticker_epoch`
    /// - start time at or after the epoch: bucket at the start time
    /// - start time in the past: re-phase onto the next slot that is a
    ///   whole number of intervals past the start time, keeping the firing
    ///   phase modulo interval intact across the startup boundary
    pub fn initialize(specs: Vec<LineSpec>, ticker_epoch: i64) -> Result<Self, ContractError> {
        let mut table = Self::new();

        for spec in specs {
            let target = match &spec.start_time {
                None => ticker_epoch,
                Some(start) => parse_start_time_today(start)?,
            };
            debug!(target, ticker_epoch, line = %spec.text, "placing line");

            let bucket = if target >= ticker_epoch {
                target
            } else {
                let offset = (target - ticker_epoch).rem_euclid(spec.interval_secs as i64);
                if offset == 0 {
                    // The epoch is an exact multiple of the interval past
                    // the target, so it aligns with no skew
                    ticker_epoch
                } else {
                    ticker_epoch + offset
                }
            };

            table.insert(bucket, spec);
        }

        info!(
            lines = table.len(),
            buckets = table.bucket_count(),
            "schedule table initialized"
        );
        Ok(table)
    }

    /// Insert a spec into the bucket for `at`
    pub fn insert(&mut self, at: i64, spec: LineSpec) {
        self.buckets.entry(at).or_default().push(spec);
    }

    /// Detach every spec due at or before `now`, removing their buckets.
    ///
    /// Detaching everything `<= now` instead of the exact second means a
    /// ticker stall can never strand a bucket in the past.
    pub fn detach_due(&mut self, now: i64) -> Vec<LineSpec> {
        let pending = self.buckets.split_off(&(now + 1));
        let due: Vec<LineSpec> = std::mem::replace(&mut self.buckets, pending)
            .into_values()
            .flatten()
            .collect();
        due
    }

    /// Total number of scheduled specs
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether no specs are scheduled
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of occupied buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket key holding the given spec text, if any (diagnostics)
    pub fn bucket_of(&self, text: &str) -> Option<i64> {
        self.buckets
            .iter()
            .find(|(_, specs)| specs.iter().any(|s| s.text == text))
            .map(|(at, _)| *at)
    }
}

/// Parse `HH:MM:SS` against "today" in the reference timezone, truncated
/// to whole seconds
fn parse_start_time_today(start: &str) -> Result<i64, ContractError> {
    let time = NaiveTime::parse_from_str(start, START_TIME_FORMAT)
        .map_err(|e| ContractError::start_time(start, e.to_string()))?;

    let today = Utc::now().with_timezone(&Los_Angeles).date_naive();
    let local = Los_Angeles
        .from_local_datetime(&today.and_time(time))
        .earliest()
        .ok_or_else(|| ContractError::start_time(start, "nonexistent local time"))?;

    Ok(local.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkRoute;

    fn spec(text: &str, interval_secs: u64, start_time: Option<String>) -> LineSpec {
        LineSpec {
            text: text.into(),
            route: SinkRoute::File,
            interval_secs,
            interval_std_dev: 0.0,
            timestamp_format: "epoch".into(),
            start_time,
        }
    }

    /// Today's `HH:MM:SS` string and unix timestamp for `offset` seconds
    /// before noon in the reference timezone
    fn today_at_noon_minus(offset: i64) -> (String, i64) {
        let today = Utc::now().with_timezone(&Los_Angeles).date_naive();
        let noon = Los_Angeles
            .from_local_datetime(&today.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .timestamp();
        let target = noon - offset;
        let rendered = chrono::DateTime::from_timestamp(target, 0)
            .unwrap()
            .with_timezone(&Los_Angeles)
            .format("%H:%M:%S")
            .to_string();
        (rendered, target)
    }

    #[test]
    fn test_no_start_time_lands_on_epoch() {
        let epoch = 1_700_000_000;
        let table = ScheduleTable::initialize(vec![spec("a", 60, None)], epoch).unwrap();
        assert_eq!(table.bucket_of("a"), Some(epoch));
    }

    #[test]
    fn test_past_start_time_exact_multiple_lands_on_epoch() {
        // Start 120s before the epoch with a 60s interval: offset 0
        let (start, target) = today_at_noon_minus(120);
        let epoch = target + 120;
        let table =
            ScheduleTable::initialize(vec![spec("a", 60, Some(start))], epoch).unwrap();
        assert_eq!(table.bucket_of("a"), Some(epoch));
    }

    #[test]
    fn test_past_start_time_rephases_forward() {
        // Start 25s before the epoch with a 60s interval: offset 35
        let (start, target) = today_at_noon_minus(25);
        let epoch = target + 25;
        let table =
            ScheduleTable::initialize(vec![spec("a", 60, Some(start))], epoch).unwrap();
        assert_eq!(table.bucket_of("a"), Some(epoch + 35));
    }

    #[test]
    fn test_past_start_time_keeps_phase_across_intervals() {
        // Start 61s before the epoch with a 60s interval: the next
        // phase-aligned slot is 59s out, not 1s
        let (start, target) = today_at_noon_minus(61);
        let epoch = target + 61;
        let table =
            ScheduleTable::initialize(vec![spec("a", 60, Some(start))], epoch).unwrap();
        assert_eq!(table.bucket_of("a"), Some(epoch + 59));
    }

    #[test]
    fn test_future_start_time_lands_on_target() {
        let (start, target) = today_at_noon_minus(0);
        // Epoch well before today's noon target
        let epoch = target - 3600;
        let table =
            ScheduleTable::initialize(vec![spec("a", 60, Some(start))], epoch).unwrap();
        assert_eq!(table.bucket_of("a"), Some(target));
    }

    #[test]
    fn test_invalid_start_time_rejected() {
        let result = ScheduleTable::initialize(vec![spec("a", 60, Some("25:99".into()))], 0);
        assert!(matches!(result, Err(ContractError::StartTime { .. })));
    }

    #[test]
    fn test_detach_due_removes_buckets() {
        let mut table = ScheduleTable::new();
        table.insert(100, spec("a", 60, None));
        table.insert(100, spec("b", 60, None));
        table.insert(101, spec("c", 60, None));

        let due = table.detach_due(100);
        assert_eq!(due.len(), 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.bucket_of("c"), Some(101));
        // No stale empty bucket left behind
        assert_eq!(table.bucket_count(), 1);
    }

    #[test]
    fn test_detach_due_catches_up_missed_seconds() {
        let mut table = ScheduleTable::new();
        table.insert(98, spec("late", 60, None));
        table.insert(100, spec("due", 60, None));
        table.insert(103, spec("future", 60, None));

        let due = table.detach_due(100);
        assert_eq!(due.len(), 2);
        assert_eq!(table.bucket_of("future"), Some(103));
    }

    #[test]
    fn test_detach_due_noop_when_nothing_due() {
        let mut table = ScheduleTable::new();
        table.insert(200, spec("a", 60, None));
        assert!(table.detach_due(100).is_empty());
        assert_eq!(table.len(), 1);
    }
}
