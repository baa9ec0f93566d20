//! Command dispatcher: turns validated frames into typed reports.
//!
//! Decoding is pure. Side effects (dialect feedback, change detection,
//! publishing) are applied by the session that owns the shared state.

use crate::constants::*;
use crate::error::{R24Error, Result};
use crate::frame::Frame;
use crate::types::*;

/// A decoded telemetry field
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Heartbeat,
    ResetAck,
    ProductMode(String),
    ProductId(String),
    HardwareModel(String),
    FirmwareVersion(String),
    ProtocolType(ProtocolType),
    InitComplete(bool),
    SceneMode(SceneMode),
    Sensitivity(u8),
    MovingTargetMaxDistance(u16),
    StaticTargetMaxDistance(u16),
    OutputSwitch(bool),
    SpatialStaticValue(u8),
    /// Raw 0.5 m steps
    StaticDistance(u8),
    SpatialMotionValue(u8),
    /// Raw 0.5 m steps
    MotionDistance(u8),
    /// Raw speed, 10 means still
    MotionSpeed(u8),
    Approach(Approach),
    MovementSigns(u8),
    JudgmentThreshold(u8),
    AmplitudeTriggerThreshold(u8),
    PerceptionBoundary(Boundary),
    TriggerBoundary(Boundary),
    MotionTriggerTime(u32),
    MovementToRestTime(u32),
    EnterUnmannedTime(u32),
    PresenceRange(PresenceRange),
    Presence(bool),
    MotionStatus(MotionStatus),
    UnmannedTime(UnmannedTime),
}

impl Report {
    /// Telemetry channel this report feeds, if any
    pub fn metric(&self) -> Option<Metric> {
        let metric = match self {
            Report::Heartbeat | Report::ResetAck => return None,
            Report::ProductMode(_) => Metric::ProductMode,
            Report::ProductId(_) => Metric::ProductId,
            Report::HardwareModel(_) => Metric::HardwareModel,
            Report::FirmwareVersion(_) => Metric::FirmwareVersion,
            Report::ProtocolType(_) => Metric::ProtocolType,
            Report::InitComplete(_) => Metric::InitComplete,
            Report::SceneMode(_) => Metric::SceneMode,
            Report::Sensitivity(_) => Metric::Sensitivity,
            Report::MovingTargetMaxDistance(_) => Metric::MovingTargetMaxDistance,
            Report::StaticTargetMaxDistance(_) => Metric::StaticTargetMaxDistance,
            Report::OutputSwitch(_) => Metric::OutputSwitch,
            Report::SpatialStaticValue(_) => Metric::SpatialStaticValue,
            Report::StaticDistance(_) => Metric::StaticDistance,
            Report::SpatialMotionValue(_) => Metric::SpatialMotionValue,
            Report::MotionDistance(_) => Metric::MotionDistance,
            Report::MotionSpeed(_) => Metric::MotionSpeed,
            Report::Approach(_) => Metric::Approach,
            Report::MovementSigns(_) => Metric::MovementSigns,
            Report::JudgmentThreshold(_) => Metric::JudgmentThreshold,
            Report::AmplitudeTriggerThreshold(_) => Metric::AmplitudeTriggerThreshold,
            Report::PerceptionBoundary(_) => Metric::PerceptionBoundary,
            Report::TriggerBoundary(_) => Metric::TriggerBoundary,
            Report::MotionTriggerTime(_) => Metric::MotionTriggerTime,
            Report::MovementToRestTime(_) => Metric::MovementToRestTime,
            Report::EnterUnmannedTime(_) => Metric::EnterUnmannedTime,
            Report::PresenceRange(_) => Metric::PresenceRange,
            Report::Presence(_) => Metric::Presence,
            Report::MotionStatus(_) => Metric::MotionStatus,
            Report::UnmannedTime(_) => Metric::UnmannedTime,
        };
        Some(metric)
    }

    /// Value to publish, scaled and labelled
    pub fn value(&self) -> Option<Value> {
        let value = match self {
            Report::Heartbeat | Report::ResetAck => return None,
            Report::ProductMode(s)
            | Report::ProductId(s)
            | Report::HardwareModel(s)
            | Report::FirmwareVersion(s) => Value::Text(s.clone()),
            Report::ProtocolType(p) => Value::Text(p.label().to_string()),
            Report::InitComplete(v) | Report::OutputSwitch(v) | Report::Presence(v) => {
                Value::Bool(*v)
            }
            Report::SceneMode(m) => Value::Text(m.label().to_string()),
            Report::Sensitivity(v)
            | Report::SpatialStaticValue(v)
            | Report::SpatialMotionValue(v)
            | Report::MovementSigns(v)
            | Report::JudgmentThreshold(v)
            | Report::AmplitudeTriggerThreshold(v) => Value::UInt(*v as u64),
            Report::MovingTargetMaxDistance(d) | Report::StaticTargetMaxDistance(d) => {
                Value::UInt(*d as u64)
            }
            Report::StaticDistance(d) | Report::MotionDistance(d) => Value::Float(*d as f64 * 0.5),
            Report::MotionSpeed(s) => Value::Float((*s as f64 - 10.0) * 0.5),
            Report::Approach(a) => Value::Text(a.label().to_string()),
            Report::PerceptionBoundary(b) | Report::TriggerBoundary(b) => Value::Text(b.label()),
            Report::MotionTriggerTime(t)
            | Report::MovementToRestTime(t)
            | Report::EnterUnmannedTime(t) => Value::UInt(*t as u64),
            Report::PresenceRange(r) => Value::Text(r.label()),
            Report::MotionStatus(m) => Value::Text(m.label().to_string()),
            Report::UnmannedTime(t) => Value::Text(t.label().to_string()),
        };
        Some(value)
    }

    /// Raw value compared by the change cache, for high-frequency metrics
    pub fn change_key(&self) -> Option<u32> {
        match self {
            Report::MovementSigns(v)
            | Report::SpatialStaticValue(v)
            | Report::StaticDistance(v)
            | Report::SpatialMotionValue(v)
            | Report::MotionDistance(v)
            | Report::MotionSpeed(v) => Some(*v as u32),
            Report::MotionTriggerTime(t)
            | Report::MovementToRestTime(t)
            | Report::EnterUnmannedTime(t) => Some(*t),
            _ => None,
        }
    }
}

/// Decode a validated frame into zero or more reports.
///
/// Unknown control/command words, out-of-range indices and oversize strings
/// come back as errors; the caller logs them and moves on.
pub fn decode(frame: &Frame) -> Result<Vec<Report>> {
    match frame.control {
        CTRL_SYSTEM => decode_system(frame),
        CTRL_PRODUCT => decode_product(frame),
        CTRL_WORK_STATUS => decode_work_status(frame),
        CTRL_DETECTION_RANGE => decode_detection_range(frame),
        CTRL_OPEN_INFO => decode_open_info(frame),
        CTRL_HUMAN => decode_human(frame),
        other => Err(R24Error::UnknownControl(other)),
    }
}

fn unknown(frame: &Frame) -> R24Error {
    R24Error::UnknownCommand {
        control: frame.control,
        command: frame.command,
    }
}

fn out_of_range(field: &'static str, value: u8) -> R24Error {
    R24Error::OutOfRange {
        field,
        value: value as u32,
    }
}

fn decode_system(frame: &Frame) -> Result<Vec<Report>> {
    match frame.command {
        0x01 => {
            log::debug!("Reply: query heartbeat packet");
            Ok(vec![Report::Heartbeat])
        }
        0x02 => {
            log::debug!("Reply: query reset packet");
            Ok(vec![Report::ResetAck])
        }
        _ => Err(unknown(frame)),
    }
}

fn product_string(frame: &Frame) -> Result<String> {
    let length = frame.payload.len();
    if length >= PRODUCT_STRING_MAX_LEN {
        return Err(R24Error::OversizeString { length });
    }
    // C string: text ends at the first NUL
    let end = frame
        .payload
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(length);
    Ok(String::from_utf8_lossy(&frame.payload[..end]).into_owned())
}

fn decode_product(frame: &Frame) -> Result<Vec<Report>> {
    let report = match frame.command {
        0xA1 => Report::ProductMode(product_string(frame)?),
        0xA2 => Report::ProductId(product_string(frame)?),
        0xA3 => Report::HardwareModel(product_string(frame)?),
        0xA4 => Report::FirmwareVersion(product_string(frame)?),
        0xA5 => Report::ProtocolType(ProtocolType::from_u8(frame.byte(0)?)),
        _ => return Err(unknown(frame)),
    };
    log::debug!("Reply: get product info {:?}", report);
    Ok(vec![report])
}

fn decode_work_status(frame: &Frame) -> Result<Vec<Report>> {
    let report = match frame.command {
        // 0x01: init complete report, 0x81: init status reply (1 complete, 2 incomplete)
        0x01 | 0x81 => Report::InitComplete(frame.byte(0)? == 0x01),
        0x07 | 0x87 => {
            let raw = frame.byte(0)?;
            Report::SceneMode(SceneMode::from_u8(raw).ok_or_else(|| out_of_range("scene mode", raw))?)
        }
        0x08 | 0x88 => Report::Sensitivity(frame.byte(0)?),
        _ => return Err(unknown(frame)),
    };
    log::debug!("Reply: work status {:#04x} -> {:?}", frame.command, report);
    Ok(vec![report])
}

fn decode_detection_range(frame: &Frame) -> Result<Vec<Report>> {
    let report = match frame.command {
        0x01 | 0x81 => Report::MovingTargetMaxDistance(frame.be_u16(0)?),
        0x04 | 0x84 => Report::StaticTargetMaxDistance(frame.be_u16(0)?),
        _ => return Err(unknown(frame)),
    };
    log::debug!("Reply: detection range {:?}", report);
    Ok(vec![report])
}

fn decode_open_info(frame: &Frame) -> Result<Vec<Report>> {
    let reports = match frame.command {
        0x00 | 0x80 => vec![Report::OutputSwitch(frame.byte(0)? != 0)],
        0x01 => {
            // static value, static distance, motion value, motion distance, speed
            vec![
                Report::SpatialStaticValue(frame.byte(0)?),
                Report::StaticDistance(frame.byte(1)?),
                Report::SpatialMotionValue(frame.byte(2)?),
                Report::MotionDistance(frame.byte(3)?),
                Report::MotionSpeed(frame.byte(4)?),
            ]
        }
        0x86 => {
            log::debug!("Reply: get keep away {}", frame.byte(0)?);
            Vec::new()
        }
        0x06 => {
            let raw = frame.byte(0)?;
            vec![Report::Approach(
                Approach::from_u8(raw).ok_or_else(|| out_of_range("approach", raw))?,
            )]
        }
        0x07 | 0x87 => vec![Report::MovementSigns(frame.byte(0)?)],
        0x08 | 0x88 => vec![Report::JudgmentThreshold(frame.byte(0)?)],
        0x09 | 0x89 => vec![Report::AmplitudeTriggerThreshold(frame.byte(0)?)],
        0x0A | 0x8A => {
            let raw = frame.byte(0)?;
            vec![Report::PerceptionBoundary(
                Boundary::from_u8(raw).ok_or_else(|| out_of_range("perception boundary", raw))?,
            )]
        }
        0x0B | 0x8B => {
            let raw = frame.byte(0)?;
            vec![Report::TriggerBoundary(
                Boundary::from_u8(raw).ok_or_else(|| out_of_range("trigger boundary", raw))?,
            )]
        }
        0x0C | 0x8C => vec![Report::MotionTriggerTime(frame.be_u32(0)?)],
        0x0D | 0x8D => vec![Report::MovementToRestTime(frame.be_u32(0)?)],
        0x0E | 0x8E => vec![Report::EnterUnmannedTime(frame.be_u32(0)?)],
        0x81 => {
            log::debug!("Reply: get spatial static value {}", frame.byte(0)?);
            Vec::new()
        }
        0x82 => {
            log::debug!("Reply: get spatial motion amplitude {}", frame.byte(0)?);
            Vec::new()
        }
        0x83 => {
            let raw = frame.byte(0)?;
            vec![Report::PresenceRange(
                PresenceRange::from_u8(raw).ok_or_else(|| out_of_range("presence range", raw))?,
            )]
        }
        0x84 => vec![Report::MotionDistance(frame.byte(0)?)],
        0x85 => vec![Report::MotionSpeed(frame.byte(0)?)],
        _ => return Err(unknown(frame)),
    };
    log::debug!("Reply: open info {:#04x} -> {:?}", frame.command, reports);
    Ok(reports)
}

fn decode_human(frame: &Frame) -> Result<Vec<Report>> {
    let report = match frame.command {
        0x01 | 0x81 => Report::Presence(frame.byte(0)? != 0),
        0x02 | 0x82 => {
            let raw = frame.byte(0)?;
            Report::MotionStatus(
                MotionStatus::from_u8(raw).ok_or_else(|| out_of_range("motion status", raw))?,
            )
        }
        0x03 | 0x83 => Report::MovementSigns(frame.byte(0)?),
        0x0A | 0x8A => {
            let raw = frame.byte(0)?;
            Report::UnmannedTime(
                UnmannedTime::from_u8(raw).ok_or_else(|| out_of_range("unmanned time", raw))?,
            )
        }
        0x0B | 0x8B => {
            let raw = frame.byte(0)?;
            Report::Approach(Approach::from_u8(raw).ok_or_else(|| out_of_range("approach", raw))?)
        }
        _ => return Err(unknown(frame)),
    };
    log::debug!("Report: human info {:#04x} -> {:?}", frame.command, report);
    Ok(vec![report])
}
