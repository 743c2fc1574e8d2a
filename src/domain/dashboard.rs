// Dashboard view model - what the renderers draw after each reconciliation
use super::call::{CallRecord, IvrSelection};
use super::chart::ChartPoint;
use super::format::{format_call_duration, format_phone_number, short_sid};
use super::load::LoadClassification;
use serde::Serialize;

pub const NO_ACTIVE_CALLS: &str = "No active calls";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IvrStatus {
    pub label: &'static str,
    pub icon: &'static str,
}

impl From<IvrSelection> for IvrStatus {
    fn from(selection: IvrSelection) -> Self {
        match selection {
            IvrSelection::None => IvrStatus {
                label: "Waiting for selection...",
                icon: "question-circle",
            },
            IvrSelection::Music => IvrStatus {
                label: "Playing Music",
                icon: "music",
            },
            IvrSelection::Beep => IvrStatus {
                label: "Playing Beep (3s)",
                icon: "volume-up",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRow {
    pub call_sid: String,
    pub short_sid: String,
    pub from: String,
    pub to: String,
    pub duration: String,
    pub ivr: IvrStatus,
    pub start_time: Option<String>,
}

impl CallRow {
    pub fn from_record(record: &CallRecord) -> Self {
        Self {
            call_sid: record.call_sid.clone(),
            short_sid: short_sid(&record.call_sid).to_string(),
            from: format_phone_number(record.from_number.as_deref().unwrap_or_default()),
            to: format_phone_number(record.to_number.as_deref().unwrap_or_default()),
            duration: format_call_duration(record.duration),
            ivr: IvrStatus::from(record.ivr_selection),
            start_time: record.start_time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub count: i64,
    pub load: LoadClassification,
    pub calls: Vec<CallRow>,
    /// Set when there is nothing to list.
    pub placeholder: Option<&'static str>,
    pub chart: Vec<ChartPoint>,
    pub snapshots_applied: u64,
}
