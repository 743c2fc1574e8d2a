// Dashboard state - the single owner of derived view state
use crate::domain::call::{CallRecord, CallSnapshot};
use crate::domain::chart::ChartBuffer;
use crate::domain::dashboard::{CallRow, DashboardView, NO_ACTIVE_CALLS};
use crate::domain::format::format_timestamp;
use crate::domain::load::{classify_load, LoadClassification};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

pub const MISSING_TIMESTAMP_LABEL: &str = "--:--:--";

#[derive(Debug, Clone)]
pub struct DashboardState {
    chart: ChartBuffer,
    count: i64,
    last_count: Option<i64>,
    load: LoadClassification,
    calls: Vec<CallRow>,
    snapshots_applied: u64,
}

impl DashboardState {
    pub fn init() -> Self {
        Self {
            chart: ChartBuffer::new(),
            count: 0,
            last_count: None,
            load: classify_load(0),
            calls: Vec::new(),
            snapshots_applied: 0,
        }
    }

    /// Apply one snapshot to every piece of derived state. Never fails:
    /// malformed inputs were defaulted at decode time and display values
    /// fall back to their raw form.
    pub fn reconcile(&mut self, snapshot: &CallSnapshot) -> DashboardView {
        let count = snapshot.count;
        let load = classify_load(count);

        let previous = (self.snapshots_applied > 0).then_some(self.count);
        if previous.is_some() && load.tier != self.load.tier {
            tracing::info!(
                from = self.load.label,
                to = load.label,
                count,
                "Load tier changed"
            );
        }

        self.last_count = previous;
        self.count = count;
        self.load = load;
        self.calls = newest_first(&snapshot.calls)
            .into_iter()
            .map(CallRow::from_record)
            .collect();

        let label = snapshot
            .timestamp
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| MISSING_TIMESTAMP_LABEL.to_string());
        self.chart.push(label, count);

        self.snapshots_applied += 1;
        self.view()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            count: self.count,
            load: self.load.clone(),
            calls: self.calls.clone(),
            placeholder: self.calls.is_empty().then_some(NO_ACTIVE_CALLS),
            chart: self.chart.points(),
            snapshots_applied: self.snapshots_applied,
        }
    }

    /// Count shown before the most recent snapshot, if any was shown.
    pub fn last_count(&self) -> Option<i64> {
        self.last_count
    }

    pub fn chart(&self) -> &ChartBuffer {
        &self.chart
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::init()
    }
}

/// Stable sort by start time, newest first. Calls whose start time cannot be
/// parsed go last, in their original order.
fn newest_first(calls: &[CallRecord]) -> Vec<&CallRecord> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &CallRecord)> =
        calls.iter().map(|call| (call.started_at(), call)).collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, call)| call).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call::IvrSelection;
    use crate::domain::load::LoadTier;
    use chrono::{Local, TimeZone};

    fn call(sid: &str, start_time: &str) -> CallRecord {
        CallRecord::new(sid, "5551234567", "15559876543", start_time)
    }

    fn snapshot(calls: Vec<CallRecord>, count: i64, timestamp: &str) -> CallSnapshot {
        CallSnapshot::new(calls, count, Some(timestamp.to_string()))
    }

    fn sids(view: &DashboardView) -> Vec<&str> {
        view.calls.iter().map(|row| row.call_sid.as_str()).collect()
    }

    #[test]
    fn test_empty_snapshot_shows_placeholder() {
        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(vec![], 0, "2024-05-01 12:00:00"));

        assert!(view.calls.is_empty());
        assert_eq!(view.placeholder, Some("No active calls"));
        assert_eq!(view.count, 0);
        assert_eq!(view.load.tier, LoadTier::Low);
        assert_eq!(view.chart.len(), 1);
    }

    #[test]
    fn test_placeholder_does_not_affect_count() {
        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(vec![], 12, "2024-05-01 12:00:00"));

        assert_eq!(view.placeholder, Some(NO_ACTIVE_CALLS));
        assert_eq!(view.count, 12);
        assert_eq!(view.load.tier, LoadTier::Medium);
        assert_eq!(view.chart[0].value, 12);
    }

    #[test]
    fn test_calls_already_descending_keep_order() {
        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(
            vec![
                call("CA-newer", "2024-05-01 12:00:02"),
                call("CA-older", "2024-05-01 12:00:01"),
            ],
            2,
            "2024-05-01 12:00:03",
        ));
        assert_eq!(sids(&view), vec!["CA-newer", "CA-older"]);
        assert!(view.placeholder.is_none());
    }

    #[test]
    fn test_calls_ascending_are_resorted() {
        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(
            vec![
                call("CA-older", "2024-05-01 12:00:01"),
                call("CA-newer", "2024-05-01 12:00:02"),
            ],
            2,
            "2024-05-01 12:00:03",
        ));
        assert_eq!(sids(&view), vec!["CA-newer", "CA-older"]);
    }

    #[test]
    fn test_ties_and_unparseable_start_times_keep_input_order() {
        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(
            vec![
                call("CA-bad-1", "soon"),
                call("CA-tie-1", "2024-05-01 12:00:01"),
                call("CA-bad-2", ""),
                call("CA-tie-2", "2024-05-01 12:00:01"),
                call("CA-new", "2024-05-01 12:00:09"),
            ],
            5,
            "2024-05-01 12:00:10",
        ));
        assert_eq!(
            sids(&view),
            vec!["CA-new", "CA-tie-1", "CA-tie-2", "CA-bad-1", "CA-bad-2"]
        );
    }

    #[test]
    fn test_ivr_status_per_row() {
        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(
            vec![
                call("CA-music", "2024-05-01 12:00:03")
                    .with_ivr_selection(IvrSelection::Music),
                call("CA-beep", "2024-05-01 12:00:02").with_ivr_selection(IvrSelection::Beep),
                call("CA-none", "2024-05-01 12:00:01"),
            ],
            3,
            "2024-05-01 12:00:04",
        ));
        let labels: Vec<&str> = view.calls.iter().map(|row| row.ivr.label).collect();
        assert_eq!(
            labels,
            vec!["Playing Music", "Playing Beep (3s)", "Waiting for selection..."]
        );
    }

    #[test]
    fn test_tier_moves_low_to_medium_between_snapshots() {
        let mut state = DashboardState::init();
        let first = state.reconcile(&snapshot(vec![], 9, "2024-05-01 12:00:00"));
        let second = state.reconcile(&snapshot(vec![], 10, "2024-05-01 12:00:01"));

        assert_eq!(first.load.tier, LoadTier::Low);
        assert_eq!(second.load.tier, LoadTier::Medium);
        assert_eq!(state.last_count(), Some(9));
    }

    #[test]
    fn test_last_count_is_unset_until_a_count_was_shown() {
        let mut state = DashboardState::init();
        assert_eq!(state.last_count(), None);

        state.reconcile(&snapshot(vec![], 6, "2024-05-01 12:00:00"));
        assert_eq!(state.last_count(), None);

        state.reconcile(&snapshot(vec![], 0, "2024-05-01 12:00:01"));
        assert_eq!(state.last_count(), Some(6));
    }

    #[test]
    fn test_mixed_naive_and_zoned_start_times_sort_by_local_reading() {
        let naive = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let local = Local.from_local_datetime(&naive).earliest().unwrap();
        let before = (local - chrono::Duration::seconds(30)).to_rfc3339();
        let after = (local + chrono::Duration::seconds(30)).to_rfc3339();

        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot(
            vec![
                call("CA-zoned-before", &before),
                call("CA-naive", "2024-05-01 12:00:00"),
                call("CA-zoned-after", &after),
            ],
            3,
            "2024-05-01 12:01:00",
        ));
        assert_eq!(
            sids(&view),
            vec!["CA-zoned-after", "CA-naive", "CA-zoned-before"]
        );
    }

    #[test]
    fn test_mistyped_call_fields_still_render_rows() {
        let snapshot = CallSnapshot::from_json(
            r#"{"count": 2, "timestamp": "2024-05-01 12:00:05", "calls": [
                {"call_sid": "CA-ivr", "start_time": "2024-05-01 12:00:02", "ivr_selection": 2},
                {"call_sid": "CA-num", "start_time": "2024-05-01 12:00:01", "from_number": 5551234567}
            ]}"#,
        )
        .unwrap();

        let mut state = DashboardState::init();
        let view = state.reconcile(&snapshot);
        assert_eq!(view.placeholder, None);
        assert_eq!(sids(&view), vec!["CA-ivr", "CA-num"]);
        assert_eq!(view.calls[0].ivr.label, "Waiting for selection...");
        assert_eq!(view.calls[1].from, "(555) 123-4567");
    }

    #[test]
    fn test_chart_is_keyed_by_snapshot_time() {
        let mut state = DashboardState::init();
        state.reconcile(&snapshot(vec![], 4, "2024-05-01 08:15:30"));
        state.reconcile(&CallSnapshot::new(vec![], 5, None));

        let labels: Vec<&str> = state.chart().labels().collect();
        assert_eq!(labels, vec!["08:15:30", MISSING_TIMESTAMP_LABEL]);
        assert_eq!(state.chart().values().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_chart_window_is_bounded_across_snapshots() {
        let mut state = DashboardState::init();
        let mut view = state.view();
        for i in 0..30 {
            view = state.reconcile(&snapshot(vec![], i, &format!("2024-05-01 12:00:{:02}", i)));
        }
        assert_eq!(view.chart.len(), state.chart().capacity());
        assert_eq!(state.chart().latest().map(|p| p.value), Some(29));
        assert_eq!(view.chart.first().unwrap().value, 10);
        assert_eq!(view.chart.last().unwrap().label, "12:00:29");
        assert_eq!(view.snapshots_applied, 30);
    }
}
