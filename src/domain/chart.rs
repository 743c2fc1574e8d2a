// Fixed-window time series backing the call history chart
use serde::Serialize;
use std::collections::VecDeque;

pub const CHART_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: i64,
}

/// Labels and values kept in lockstep, oldest first. Once full, every push
/// evicts exactly one point from the head.
#[derive(Debug, Clone)]
pub struct ChartBuffer {
    labels: VecDeque<String>,
    values: VecDeque<i64>,
    capacity: usize,
}

impl ChartBuffer {
    pub fn new() -> Self {
        Self::with_capacity(CHART_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: VecDeque::with_capacity(capacity + 1),
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, label: String, value: i64) {
        self.labels.push_back(label);
        self.values.push_back(value);

        if self.labels.len() > self.capacity {
            self.labels.pop_front();
            self.values.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.iter().copied()
    }

    pub fn points(&self) -> Vec<ChartPoint> {
        self.labels()
            .zip(self.values())
            .map(|(label, value)| ChartPoint {
                label: label.to_string(),
                value,
            })
            .collect()
    }

    /// Most recently pushed point.
    pub fn latest(&self) -> Option<ChartPoint> {
        if self.is_empty() {
            return None;
        }
        let label = self.labels.back()?;
        let value = self.values.back()?;
        Some(ChartPoint {
            label: label.clone(),
            value: *value,
        })
    }
}

impl Default for ChartBuffer {
    fn default() -> Self {
        Self::new()
    }
}
