// Capacity classification of the active call count
use serde::Serialize;

pub const MEDIUM_LOAD_THRESHOLD: i64 = 10;
pub const HIGH_LOAD_THRESHOLD: i64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTier {
    Low,
    Medium,
    High,
}

impl LoadTier {
    pub fn label(&self) -> &'static str {
        match self {
            LoadTier::Low => "Low Load",
            LoadTier::Medium => "Medium Load",
            LoadTier::High => "High Load",
        }
    }

    /// Style tag the presentation layer applies to the count and badge.
    pub fn style(&self) -> &'static str {
        match self {
            LoadTier::Low => "success",
            LoadTier::Medium => "warning",
            LoadTier::High => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadClassification {
    pub tier: LoadTier,
    pub label: &'static str,
    pub style: &'static str,
}

pub fn classify_load(count: i64) -> LoadClassification {
    let tier = if count < MEDIUM_LOAD_THRESHOLD {
        LoadTier::Low
    } else if count < HIGH_LOAD_THRESHOLD {
        LoadTier::Medium
    } else {
        LoadTier::High
    };

    LoadClassification {
        tier,
        label: tier.label(),
        style: tier.style(),
    }
}
