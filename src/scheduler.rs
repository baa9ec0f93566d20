//! Poll scheduler: one outbound query per step, ordered by dialect.

use crate::query::Query;
use crate::types::Dialect;

/// Queries swept while the module speaks the standard protocol.
/// A heartbeat query follows the last entry.
pub const STANDARD_QUERIES: [Query; 13] = [
    Query::ProductMode,
    Query::ProductId,
    Query::FirmwareVersion,
    Query::HardwareModel,
    Query::ProtocolType,
    Query::HumanStatus,
    Query::SceneMode,
    Query::Sensitivity,
    Query::InitStatus,
    Query::MovingTargetMaxDistance,
    Query::StaticTargetMaxDistance,
    Query::UnmannedTime,
    Query::OutputSwitch,
];

/// Queries swept while the open (custom) information output is on.
/// A heartbeat query follows the last entry.
pub const CUSTOM_QUERIES: [Query; 9] = [
    Query::OutputSwitch,
    Query::PresenceRange,
    Query::JudgmentThreshold,
    Query::AmplitudeTriggerThreshold,
    Query::PerceptionBoundary,
    Query::TriggerBoundary,
    Query::MotionTriggerTime,
    Query::MovementToRestTime,
    Query::EnterUnmannedTime,
];

/// Position within one dialect's sweep. Index `len` is the heartbeat slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Standard(usize),
    Custom(usize),
}

impl Cursor {
    fn list(&self) -> &'static [Query] {
        match self {
            Cursor::Standard(_) => &STANDARD_QUERIES,
            Cursor::Custom(_) => &CUSTOM_QUERIES,
        }
    }

    fn index(&self) -> usize {
        match *self {
            Cursor::Standard(i) | Cursor::Custom(i) => i,
        }
    }

    fn with_index(&self, index: usize) -> Self {
        match self {
            Cursor::Standard(_) => Cursor::Standard(index),
            Cursor::Custom(_) => Cursor::Custom(index),
        }
    }

    /// Query at this slot
    pub fn query(&self) -> Query {
        self.list().get(self.index()).copied().unwrap_or(Query::Heartbeat)
    }

    /// Following slot, wrapping after the heartbeat slot
    pub fn next(&self) -> Self {
        let next = self.index() + 1;
        if next > self.list().len() {
            self.with_index(0)
        } else {
            self.with_index(next)
        }
    }

    fn matches(&self, dialect: Dialect) -> bool {
        matches!(
            (self, dialect),
            (Cursor::Standard(_), Dialect::StandardProtocol)
                | (Cursor::Custom(_), Dialect::CustomProtocol)
        )
    }
}

/// Round-robin query scheduler driven by an external timer.
///
/// Owns the dialect learned from output switch replies; the session feeds
/// those replies back through [`PollScheduler::set_dialect`].
#[derive(Debug, Clone)]
pub struct PollScheduler {
    dialect: Dialect,
    cursor: Cursor,
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PollScheduler {
    /// Scheduler in the unknown dialect, probing the output switch
    pub fn new() -> Self {
        PollScheduler {
            dialect: Dialect::Unknown,
            cursor: Cursor::Custom(0),
        }
    }

    /// Dialect learned so far
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Slot the next step will use
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Record the dialect reported by an output switch reply.
    ///
    /// Returns true when the dialect changed.
    pub fn set_dialect(&mut self, dialect: Dialect) -> bool {
        if dialect == Dialect::Unknown || dialect == self.dialect {
            return false;
        }
        log::info!("Radar dialect {:?} -> {:?}", self.dialect, dialect);
        self.dialect = dialect;
        true
    }

    /// Pick the query for this step and advance.
    pub fn step(&mut self) -> Query {
        match self.dialect {
            Dialect::Unknown => {
                self.cursor = Cursor::Custom(0);
                Query::OutputSwitch
            }
            dialect => {
                if !self.cursor.matches(dialect) {
                    self.cursor = match dialect {
                        Dialect::StandardProtocol => Cursor::Standard(0),
                        _ => Cursor::Custom(0),
                    };
                }
                let query = self.cursor.query();
                self.cursor = self.cursor.next();
                query
            }
        }
    }
}
