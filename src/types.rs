use crate::error::R24Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which query/response vocabulary the attached module speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// Output information switch not yet reported
    Unknown,
    /// Underlying open information output switched off
    StandardProtocol,
    /// Underlying open information output switched on
    CustomProtocol,
}

impl Dialect {
    /// Dialect implied by an output information switch value
    pub fn from_switch(on: bool) -> Self {
        if on {
            Dialect::CustomProtocol
        } else {
            Dialect::StandardProtocol
        }
    }
}

/// Installation scene, 1-based on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneMode {
    LivingRoom = 1,
    AreaDetection = 2,
    Washroom = 3,
    Bedroom = 4,
}

impl SceneMode {
    /// Decode a wire value, `None` when out of range
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(SceneMode::LivingRoom),
            2 => Some(SceneMode::AreaDetection),
            3 => Some(SceneMode::Washroom),
            4 => Some(SceneMode::Bedroom),
            _ => None,
        }
    }

    /// Published text
    pub fn label(&self) -> &'static str {
        match self {
            SceneMode::LivingRoom => "Living room",
            SceneMode::AreaDetection => "Area detection",
            SceneMode::Washroom => "Washroom",
            SceneMode::Bedroom => "Bedroom",
        }
    }
}

/// Motion state of the detected body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionStatus {
    None = 0,
    Stationary = 1,
    Active = 2,
}

impl MotionStatus {
    /// Decode a wire value, `None` when out of range
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(MotionStatus::None),
            1 => Some(MotionStatus::Stationary),
            2 => Some(MotionStatus::Active),
            _ => None,
        }
    }

    /// Published text
    pub fn label(&self) -> &'static str {
        match self {
            MotionStatus::None => "None",
            MotionStatus::Stationary => "Stationary",
            MotionStatus::Active => "Active",
        }
    }
}

/// Movement direction relative to the radar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    None = 0,
    Close = 1,
    Away = 2,
}

impl Approach {
    /// Decode a wire value, `None` when out of range
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Approach::None),
            1 => Some(Approach::Close),
            2 => Some(Approach::Away),
            _ => None,
        }
    }

    /// Published text
    pub fn label(&self) -> &'static str {
        match self {
            Approach::None => "None",
            Approach::Close => "Close",
            Approach::Away => "Away",
        }
    }
}

/// Delay before the radar reports an empty room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnmannedTime {
    None = 0,
    TenSeconds = 1,
    ThirtySeconds = 2,
    OneMinute = 3,
    TwoMinutes = 4,
    FiveMinutes = 5,
    TenMinutes = 6,
    ThirtyMinutes = 7,
    OneHour = 8,
}

impl UnmannedTime {
    const ALL: [UnmannedTime; 9] = [
        UnmannedTime::None,
        UnmannedTime::TenSeconds,
        UnmannedTime::ThirtySeconds,
        UnmannedTime::OneMinute,
        UnmannedTime::TwoMinutes,
        UnmannedTime::FiveMinutes,
        UnmannedTime::TenMinutes,
        UnmannedTime::ThirtyMinutes,
        UnmannedTime::OneHour,
    ];

    /// Decode a wire value, `None` when out of range
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Published text
    pub fn label(&self) -> &'static str {
        match self {
            UnmannedTime::None => "None",
            UnmannedTime::TenSeconds => "10s",
            UnmannedTime::ThirtySeconds => "30s",
            UnmannedTime::OneMinute => "1min",
            UnmannedTime::TwoMinutes => "2min",
            UnmannedTime::FiveMinutes => "5min",
            UnmannedTime::TenMinutes => "10min",
            UnmannedTime::ThirtyMinutes => "30min",
            UnmannedTime::OneHour => "1hour",
        }
    }
}

/// Serial protocol flavour reported by the product info family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolType {
    Common,
    TuyaWifi,
    Unknown(u8),
}

impl ProtocolType {
    /// Decode a wire value; unrecognised codes are kept
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => ProtocolType::Common,
            0x03 => ProtocolType::TuyaWifi,
            other => ProtocolType::Unknown(other),
        }
    }

    /// Published text
    pub fn label(&self) -> &'static str {
        match self {
            ProtocolType::Common => "common",
            ProtocolType::TuyaWifi => "Tuya Wi-Fi",
            ProtocolType::Unknown(_) => "unknown",
        }
    }
}

/// Boundary setting, 1-based index into 0.5 m steps from 0.5 m to 5.0 m
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Boundary(u8);

impl Boundary {
    pub const STEPS: u8 = 10;

    /// Decode a wire value, `None` when out of range
    pub fn from_u8(value: u8) -> Option<Self> {
        (1..=Self::STEPS).contains(&value).then_some(Boundary(value))
    }

    /// Raw wire index (1..=10)
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Distance in meters
    pub fn meters(&self) -> f64 {
        self.0 as f64 * 0.5
    }

    /// Published text, e.g. `1.5m`
    pub fn label(&self) -> String {
        format!("{:.1}m", self.meters())
    }
}

/// Presence detection range: nobody, or 0.5 m steps up to 3.0 m
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PresenceRange(u8);

impl PresenceRange {
    pub const STEPS: u8 = 6;

    /// Decode a wire value, `None` when out of range
    pub fn from_u8(value: u8) -> Option<Self> {
        (value <= Self::STEPS).then_some(PresenceRange(value))
    }

    /// True for the empty-room index
    pub fn is_nobody(&self) -> bool {
        self.0 == 0
    }

    /// Distance in meters
    pub fn meters(&self) -> f64 {
        self.0 as f64 * 0.5
    }

    /// Published text, e.g. `1.5m`
    pub fn label(&self) -> String {
        if self.is_nobody() {
            "Nobody".to_string()
        } else {
            format!("{:.1}m", self.meters())
        }
    }
}

impl TryFrom<u8> for Boundary {
    type Error = R24Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Boundary::from_u8(value).ok_or(R24Error::OutOfRange {
            field: "boundary",
            value: value as u32,
        })
    }
}

impl From<Boundary> for u8 {
    fn from(boundary: Boundary) -> u8 {
        boundary.0
    }
}

impl TryFrom<u8> for PresenceRange {
    type Error = R24Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PresenceRange::from_u8(value).ok_or(R24Error::OutOfRange {
            field: "presence range",
            value: value as u32,
        })
    }
}

impl From<PresenceRange> for u8 {
    fn from(range: PresenceRange) -> u8 {
        range.0
    }
}

/// Heartbeat state as published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartbeatStatus {
    Abnormal,
    Normal,
}

impl HeartbeatStatus {
    /// Published text
    pub fn label(&self) -> &'static str {
        match self {
            HeartbeatStatus::Abnormal => "Abnormal",
            HeartbeatStatus::Normal => "Normal",
        }
    }
}

/// Telemetry channel identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Heartbeat,
    ProductMode,
    ProductId,
    HardwareModel,
    FirmwareVersion,
    ProtocolType,
    InitComplete,
    SceneMode,
    Sensitivity,
    MovingTargetMaxDistance,
    StaticTargetMaxDistance,
    OutputSwitch,
    SpatialStaticValue,
    StaticDistance,
    SpatialMotionValue,
    MotionDistance,
    MotionSpeed,
    Approach,
    MovementSigns,
    JudgmentThreshold,
    AmplitudeTriggerThreshold,
    PerceptionBoundary,
    TriggerBoundary,
    MotionTriggerTime,
    MovementToRestTime,
    EnterUnmannedTime,
    PresenceRange,
    Presence,
    MotionStatus,
    UnmannedTime,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Heartbeat => "heartbeat",
            Metric::ProductMode => "product_mode",
            Metric::ProductId => "product_id",
            Metric::HardwareModel => "hardware_model",
            Metric::FirmwareVersion => "firmware_version",
            Metric::ProtocolType => "protocol_type",
            Metric::InitComplete => "init_complete",
            Metric::SceneMode => "scene_mode",
            Metric::Sensitivity => "sensitivity",
            Metric::MovingTargetMaxDistance => "moving_target_max_distance",
            Metric::StaticTargetMaxDistance => "static_target_max_distance",
            Metric::OutputSwitch => "output_switch",
            Metric::SpatialStaticValue => "spatial_static_value",
            Metric::StaticDistance => "static_distance",
            Metric::SpatialMotionValue => "spatial_motion_value",
            Metric::MotionDistance => "motion_distance",
            Metric::MotionSpeed => "motion_speed",
            Metric::Approach => "approach",
            Metric::MovementSigns => "movement_signs",
            Metric::JudgmentThreshold => "judgment_threshold",
            Metric::AmplitudeTriggerThreshold => "amplitude_trigger_threshold",
            Metric::PerceptionBoundary => "perception_boundary",
            Metric::TriggerBoundary => "trigger_boundary",
            Metric::MotionTriggerTime => "motion_trigger_time",
            Metric::MovementToRestTime => "movement_to_rest_time",
            Metric::EnterUnmannedTime => "enter_unmanned_time",
            Metric::PresenceRange => "presence_range",
            Metric::Presence => "presence",
            Metric::MotionStatus => "motion_status",
            Metric::UnmannedTime => "unmanned_time",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published telemetry value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:.2}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

/// Last product information reported by the module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub product_mode: Option<String>,
    pub product_id: Option<String>,
    pub hardware_model: Option<String>,
    pub firmware_version: Option<String>,
    pub protocol_type: Option<ProtocolType>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_mode_is_one_based() {
        assert_eq!(SceneMode::from_u8(1), Some(SceneMode::LivingRoom));
        assert_eq!(SceneMode::from_u8(4), Some(SceneMode::Bedroom));
        assert_eq!(SceneMode::from_u8(0), None);
        assert_eq!(SceneMode::from_u8(5), None);
    }

    #[test]
    fn unmanned_time_table() {
        assert_eq!(UnmannedTime::from_u8(0), Some(UnmannedTime::None));
        assert_eq!(UnmannedTime::from_u8(8).map(|t| t.label()), Some("1hour"));
        assert_eq!(UnmannedTime::from_u8(9), None);
    }

    #[test]
    fn boundary_labels() {
        assert_eq!(Boundary::from_u8(1).map(|b| b.label()), Some("0.5m".to_string()));
        assert_eq!(Boundary::from_u8(10).map(|b| b.label()), Some("5.0m".to_string()));
        assert!(Boundary::from_u8(0).is_none());
        assert!(Boundary::from_u8(11).is_none());
    }

    #[test]
    fn presence_range_labels() {
        assert_eq!(PresenceRange::from_u8(0).map(|r| r.label()), Some("Nobody".to_string()));
        assert_eq!(PresenceRange::from_u8(6).map(|r| r.label()), Some("3.0m".to_string()));
        assert!(PresenceRange::from_u8(7).is_none());
    }

    #[test]
    fn bounded_indices_deserialize_checked() {
        let boundary: Boundary = serde_json::from_str("3").unwrap();
        assert_eq!(boundary.index(), 3);
        assert!(serde_json::from_str::<Boundary>("0").is_err());
        assert!(serde_json::from_str::<Boundary>("11").is_err());
        assert!(serde_json::from_str::<PresenceRange>("7").is_err());
        assert_eq!(serde_json::to_string(&boundary).unwrap(), "3");
    }

    #[test]
    fn protocol_type_labels() {
        assert_eq!(ProtocolType::from_u8(1).label(), "common");
        assert_eq!(ProtocolType::from_u8(3).label(), "Tuya Wi-Fi");
        assert_eq!(ProtocolType::from_u8(2), ProtocolType::Unknown(2));
    }

    #[test]
    fn metric_serializes_snake_case() {
        let json = serde_json::to_string(&Metric::MotionTriggerTime).unwrap();
        assert_eq!(json, "\"motion_trigger_time\"");
        assert_eq!(Metric::MotionTriggerTime.to_string(), "motion_trigger_time");
    }
}
