//! Outbound query and setting frames.

use crate::constants::*;
use crate::error::{R24Error, Result};
use crate::frame::Frame;
use crate::types::{Boundary, SceneMode, UnmannedTime};

/// Every query the module answers.
///
/// A query is a fixed 10 byte frame: `53 59 CC SS 00 01 0F KK 54 43`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Heartbeat,
    ProductMode,
    ProductId,
    HardwareModel,
    FirmwareVersion,
    ProtocolType,
    InitStatus,
    SceneMode,
    Sensitivity,
    MovingTargetMaxDistance,
    StaticTargetMaxDistance,
    HumanStatus,
    UnmannedTime,
    OutputSwitch,
    SpatialStaticValue,
    SpatialMotionAmplitude,
    PresenceRange,
    MovingObjectDistance,
    MovementSpeed,
    JudgmentThreshold,
    AmplitudeTriggerThreshold,
    PerceptionBoundary,
    TriggerBoundary,
    MotionTriggerTime,
    MovementToRestTime,
    EnterUnmannedTime,
}

impl Query {
    /// Control and command word pair
    pub fn words(&self) -> (u8, u8) {
        match self {
            Query::Heartbeat => (CTRL_SYSTEM, 0x01),
            Query::ProductMode => (CTRL_PRODUCT, 0xA1),
            Query::ProductId => (CTRL_PRODUCT, 0xA2),
            Query::HardwareModel => (CTRL_PRODUCT, 0xA3),
            Query::FirmwareVersion => (CTRL_PRODUCT, 0xA4),
            Query::ProtocolType => (CTRL_PRODUCT, 0xA5),
            Query::InitStatus => (CTRL_WORK_STATUS, 0x81),
            Query::SceneMode => (CTRL_WORK_STATUS, 0x87),
            Query::Sensitivity => (CTRL_WORK_STATUS, 0x88),
            Query::MovingTargetMaxDistance => (CTRL_DETECTION_RANGE, 0x81),
            Query::StaticTargetMaxDistance => (CTRL_DETECTION_RANGE, 0x84),
            Query::HumanStatus => (CTRL_HUMAN, 0x81),
            Query::UnmannedTime => (CTRL_HUMAN, 0x8A),
            Query::OutputSwitch => (CTRL_OPEN_INFO, 0x80),
            Query::SpatialStaticValue => (CTRL_OPEN_INFO, 0x81),
            Query::SpatialMotionAmplitude => (CTRL_OPEN_INFO, 0x82),
            Query::PresenceRange => (CTRL_OPEN_INFO, 0x83),
            Query::MovingObjectDistance => (CTRL_OPEN_INFO, 0x84),
            Query::MovementSpeed => (CTRL_OPEN_INFO, 0x85),
            Query::JudgmentThreshold => (CTRL_OPEN_INFO, 0x88),
            Query::AmplitudeTriggerThreshold => (CTRL_OPEN_INFO, 0x89),
            Query::PerceptionBoundary => (CTRL_OPEN_INFO, 0x8A),
            Query::TriggerBoundary => (CTRL_OPEN_INFO, 0x8B),
            Query::MotionTriggerTime => (CTRL_OPEN_INFO, 0x8C),
            Query::MovementToRestTime => (CTRL_OPEN_INFO, 0x8D),
            Query::EnterUnmannedTime => (CTRL_OPEN_INFO, 0x8E),
        }
    }

    /// Build the wire frame for this query
    pub fn encode(&self) -> [u8; 10] {
        let (control, command) = self.words();
        let mut frame = [
            HEADER1,
            HEADER2,
            control,
            command,
            0x00,
            0x01,
            QUERY_DATA_BYTE,
            0x00,
            TAIL1,
            TAIL2,
        ];
        frame[DATA_INDEX + 1] = crate::checksum::checksum(&frame);
        frame
    }
}

/// Configuration commands. The module answers each with a "set" reply
/// carrying the value it applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Reset,
    SceneMode(SceneMode),
    /// Sensitivity level 1..=3
    Sensitivity(u8),
    UnmannedTime(UnmannedTime),
    /// Distance in the module's native units
    MovingTargetMaxDistance(u16),
    StaticTargetMaxDistance(u16),
    OutputSwitch(bool),
    JudgmentThreshold(u8),
    AmplitudeTriggerThreshold(u8),
    PerceptionBoundary(Boundary),
    TriggerBoundary(Boundary),
    /// Milliseconds
    MotionTriggerTime(u32),
    /// Seconds
    MovementToRestTime(u32),
    /// Seconds
    EnterUnmannedTime(u32),
}

impl Setting {
    /// Build the frame for this setting, validating its argument
    pub fn to_frame(&self) -> Result<Frame> {
        let frame = match *self {
            Setting::Reset => Frame::new(CTRL_SYSTEM, 0x02, &[QUERY_DATA_BYTE]),
            Setting::SceneMode(mode) => Frame::new(CTRL_WORK_STATUS, 0x07, &[mode as u8]),
            Setting::Sensitivity(level) => {
                if !(1..=3).contains(&level) {
                    return Err(R24Error::OutOfRange {
                        field: "sensitivity",
                        value: level as u32,
                    });
                }
                Frame::new(CTRL_WORK_STATUS, 0x08, &[level])
            }
            Setting::UnmannedTime(time) => Frame::new(CTRL_HUMAN, 0x0A, &[time as u8]),
            Setting::MovingTargetMaxDistance(d) => {
                Frame::new(CTRL_DETECTION_RANGE, 0x01, &d.to_be_bytes())
            }
            Setting::StaticTargetMaxDistance(d) => {
                Frame::new(CTRL_DETECTION_RANGE, 0x04, &d.to_be_bytes())
            }
            Setting::OutputSwitch(on) => Frame::new(CTRL_OPEN_INFO, 0x00, &[on as u8]),
            Setting::JudgmentThreshold(v) => Frame::new(CTRL_OPEN_INFO, 0x08, &[v]),
            Setting::AmplitudeTriggerThreshold(v) => Frame::new(CTRL_OPEN_INFO, 0x09, &[v]),
            Setting::PerceptionBoundary(b) => Frame::new(CTRL_OPEN_INFO, 0x0A, &[b.index()]),
            Setting::TriggerBoundary(b) => Frame::new(CTRL_OPEN_INFO, 0x0B, &[b.index()]),
            Setting::MotionTriggerTime(t) => Frame::new(CTRL_OPEN_INFO, 0x0C, &t.to_be_bytes()),
            Setting::MovementToRestTime(t) => Frame::new(CTRL_OPEN_INFO, 0x0D, &t.to_be_bytes()),
            Setting::EnterUnmannedTime(t) => Frame::new(CTRL_OPEN_INFO, 0x0E, &t.to_be_bytes()),
        };
        Ok(frame)
    }

    /// Wire bytes for this setting
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(self.to_frame()?.to_bytes())
    }
}
