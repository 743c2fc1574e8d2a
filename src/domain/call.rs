// Call domain models - records and snapshots pushed by the harness
use crate::domain::format::{parse_timestamp, ParsedTimestamp};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// What the caller picked in the IVR menu.
///
/// Anything the harness sends other than `"music"` or `"beep"` (null,
/// numbers, other strings) is treated as "no selection yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", rename_all = "lowercase")]
pub enum IvrSelection {
    #[default]
    None,
    Music,
    Beep,
}

impl From<Value> for IvrSelection {
    fn from(raw: Value) -> Self {
        match raw.as_str() {
            Some("music") => IvrSelection::Music,
            Some("beep") => IvrSelection::Beep,
            _ => IvrSelection::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(default, deserialize_with = "lenient_sid")]
    pub call_sid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    /// Seconds since the call started, fractional as sent by the harness.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub ivr_selection: IvrSelection,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
}

impl CallRecord {
    /// Start time as a comparable instant. Naive harness times are read in
    /// the viewer's local zone, the same way they are displayed.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match parse_timestamp(self.start_time.as_deref()?)? {
            ParsedTimestamp::Zoned(dt) => Some(dt.with_timezone(&Utc)),
            ParsedTimestamp::Naive(dt) => {
                let local = Local.from_local_datetime(&dt);
                // Wall times skipped by a DST jump have no local reading.
                Some(
                    local
                        .earliest()
                        .or_else(|| local.latest())
                        .map(|t| t.with_timezone(&Utc))
                        .unwrap_or_else(|| Utc.from_utc_datetime(&dt)),
                )
            }
        }
    }
}

#[cfg(test)]
impl CallRecord {
    pub fn new(call_sid: &str, from_number: &str, to_number: &str, start_time: &str) -> Self {
        Self {
            call_sid: call_sid.to_string(),
            from_number: Some(from_number.to_string()),
            to_number: Some(to_number.to_string()),
            start_time: Some(start_time.to_string()),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_ivr_selection(mut self, selection: IvrSelection) -> Self {
        self.ivr_selection = selection;
        self
    }
}

/// One complete description of the active calls at an instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CallSnapshot {
    pub calls: Vec<CallRecord>,
    pub count: i64,
    pub timestamp: Option<String>,
}

impl CallSnapshot {
    pub fn new(calls: Vec<CallRecord>, count: i64, timestamp: Option<String>) -> Self {
        Self {
            calls,
            count,
            timestamp,
        }
    }

    /// Decode a pushed payload. Only non-JSON input is an error; missing or
    /// mistyped fields fall back to defaults.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(payload)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let count = value.get("count").and_then(integer).unwrap_or(0);

        let calls = value.get("calls").map(calls_from_value).unwrap_or_default();

        let timestamp = value
            .get("timestamp")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self::new(calls, count, timestamp)
    }
}

/// Decode a JSON array of call records, skipping entries that are not
/// objects. Mistyped fields inside an object are defaulted, never fatal.
/// Anything other than an array yields no calls.
pub fn calls_from_value(value: &Value) -> Vec<CallRecord> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            if !entry.is_object() {
                tracing::warn!(entry = %entry, "Skipping call entry that is not an object");
                return None;
            }
            match CallRecord::deserialize(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed call record");
                    None
                }
            }
        })
        .collect()
}

/// A count as the harness sends it: integral numbers, or floats truncated
/// toward zero (`3.0` is 3).
pub fn integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
}

/// Strings as-is; numbers and booleans in their JSON text form.
fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_string(Value::deserialize(deserializer)?))
}

fn lenient_sid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(integer(&Value::deserialize(deserializer)?))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_harness_payload() {
        let payload = r#"{
            "count": 2,
            "timestamp": "2024-05-01 12:00:05",
            "calls": [
                {"id": 1, "call_sid": "CA0001", "from_number": "+15551234567", "to_number": "5559876543",
                 "ivr_selection": "music", "start_time": "2024-05-01 11:59:00", "end_time": null,
                 "is_active": true, "duration": 65.4},
                {"id": 2, "call_sid": "CA0002", "from_number": "unknown", "to_number": "unknown",
                 "ivr_selection": null, "start_time": "2024-05-01 12:00:00", "end_time": null,
                 "is_active": true, "duration": null}
            ]
        }"#;

        let snapshot = CallSnapshot::from_json(payload).unwrap();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.timestamp.as_deref(), Some("2024-05-01 12:00:05"));
        assert_eq!(snapshot.calls.len(), 2);
        assert_eq!(snapshot.calls[0].ivr_selection, IvrSelection::Music);
        assert_eq!(snapshot.calls[0].duration, Some(65.4));
        assert_eq!(snapshot.calls[1].ivr_selection, IvrSelection::None);
        assert_eq!(snapshot.calls[1].duration, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot = CallSnapshot::from_json("{}").unwrap();
        assert_eq!(snapshot.count, 0);
        assert!(snapshot.calls.is_empty());
        assert!(snapshot.timestamp.is_none());

        let snapshot = CallSnapshot::from_json(r#"{"count": null, "calls": null}"#).unwrap();
        assert_eq!(snapshot.count, 0);
        assert!(snapshot.calls.is_empty());

        let snapshot = CallSnapshot::from_json(r#"{"count": "lots", "calls": "none"}"#).unwrap();
        assert_eq!(snapshot.count, 0);
        assert!(snapshot.calls.is_empty());
    }

    #[test]
    fn test_non_json_payload_is_an_error() {
        assert!(CallSnapshot::from_json("ping").is_err());
    }

    #[test]
    fn test_malformed_call_entries_are_skipped() {
        let snapshot =
            CallSnapshot::from_json(r#"{"count": 1, "calls": [42, {"call_sid": "CA1"}]}"#).unwrap();
        assert_eq!(snapshot.calls.len(), 1);
        assert_eq!(snapshot.calls[0].call_sid, "CA1");
        assert_eq!(snapshot.calls[0].from_number, None);
    }

    #[test]
    fn test_unrecognized_ivr_selection_is_none() {
        let record: CallRecord =
            serde_json::from_str(r#"{"call_sid": "CA1", "ivr_selection": "jazz"}"#).unwrap();
        assert_eq!(record.ivr_selection, IvrSelection::None);
    }

    #[test]
    fn test_mistyped_fields_keep_the_record() {
        let snapshot = CallSnapshot::from_json(
            r#"{"count": 3, "calls": [
                {"call_sid": "CA1", "from_number": "5551234567", "ivr_selection": 2},
                {"call_sid": "CA2", "from_number": 5551234567, "duration": "61.5", "is_active": "yes"},
                {"call_sid": 77, "to_number": true, "duration": [1], "id": 4.0, "ivr_selection": {"x": 1}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(snapshot.calls.len(), 3);
        assert_eq!(snapshot.calls[0].ivr_selection, IvrSelection::None);
        assert_eq!(snapshot.calls[1].from_number.as_deref(), Some("5551234567"));
        assert_eq!(snapshot.calls[1].duration, Some(61.5));
        assert_eq!(snapshot.calls[1].is_active, None);
        assert_eq!(snapshot.calls[2].call_sid, "77");
        assert_eq!(snapshot.calls[2].to_number.as_deref(), Some("true"));
        assert_eq!(snapshot.calls[2].duration, None);
        assert_eq!(snapshot.calls[2].id, Some(4));
        assert_eq!(snapshot.calls[2].ivr_selection, IvrSelection::None);
    }

    #[test]
    fn test_float_count_is_truncated() {
        assert_eq!(CallSnapshot::from_json(r#"{"count": 3.0}"#).unwrap().count, 3);
        assert_eq!(CallSnapshot::from_json(r#"{"count": 7.9}"#).unwrap().count, 7);
        assert_eq!(CallSnapshot::from_json(r#"{"count": true}"#).unwrap().count, 0);
    }

    #[test]
    fn test_started_at_accepts_both_forms() {
        let earlier = CallRecord::new("CA1", "", "", "2024-05-01 12:00:00");
        let later = CallRecord::new("CA2", "", "", "2024-05-01 12:00:01");
        assert!(later.started_at() > earlier.started_at());

        let zoned = CallRecord::new("CA3", "", "", "2024-05-01T12:00:00Z");
        let same_instant = CallRecord::new("CA4", "", "", "2024-05-01T14:00:00+02:00");
        assert!(zoned.started_at().is_some());
        assert_eq!(zoned.started_at(), same_instant.started_at());

        assert!(CallRecord::new("CA5", "", "", "yesterday").started_at().is_none());
    }

    #[test]
    fn test_naive_start_time_is_read_as_local() {
        let naive = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let local = Local.from_local_datetime(&naive).earliest().unwrap();

        let record = CallRecord::new("CA1", "", "", "2024-05-01 12:00:00");
        assert_eq!(record.started_at(), Some(local.with_timezone(&Utc)));
    }
}
