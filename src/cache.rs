//! Change detection for high-frequency telemetry and the heartbeat latch.

use crate::types::{HeartbeatStatus, Metric};
use std::collections::HashMap;

/// Last decoded raw value per deduplicated metric.
#[derive(Debug, Clone, Default)]
pub struct ChangeCache {
    last: HashMap<Metric, u32>,
}

impl ChangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for `metric` and report whether it differs from the
    /// previous one. The first value seen for a metric counts as a change.
    pub fn update(&mut self, metric: Metric, value: u32) -> bool {
        self.last.insert(metric, value) != Some(value)
    }

    /// Last stored raw value
    pub fn get(&self, metric: Metric) -> Option<u32> {
        self.last.get(&metric).copied()
    }

    /// Forget every stored value
    pub fn clear(&mut self) {
        self.last.clear();
    }
}

/// Heartbeat tri-state.
///
/// Starts `Uninitialized` and is never published in that state. A heartbeat
/// reply latches `Normal`; publishing resets it to `Abnormal`, so the next
/// publish reports `Abnormal` unless another reply arrives in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heartbeat {
    #[default]
    Uninitialized,
    Abnormal,
    Normal,
}

impl Heartbeat {
    /// Record a heartbeat reply
    pub fn mark_alive(&mut self) {
        *self = Heartbeat::Normal;
    }

    /// Status to publish now, if any, rearming the latch
    pub fn take(&mut self) -> Option<HeartbeatStatus> {
        let status = match self {
            Heartbeat::Uninitialized => return None,
            Heartbeat::Abnormal => HeartbeatStatus::Abnormal,
            Heartbeat::Normal => HeartbeatStatus::Normal,
        };
        *self = Heartbeat::Abnormal;
        Some(status)
    }
}
