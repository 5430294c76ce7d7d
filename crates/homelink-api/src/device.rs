// ── Remote device descriptors ──
//
// A `RemoteDevice` is one immutable entry as reported by the directory
// service for a single location. The reconciliation engine never mutates
// these; it only classifies and keys them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── DeviceType ──────────────────────────────────────────────────────

/// Directory-reported device type tag.
///
/// Known tags parse into dedicated variants; anything else is kept
/// verbatim in [`DeviceType::Other`] so that pattern-based rules (locks)
/// and type allow-lists can still see the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    // Sensors
    ContactSensor,
    MotionSensor,
    FloodFreezeSensor,
    FreezeSensor,
    TemperatureSensor,
    WaterSensor,
    TiltSensor,
    GlassbreakSensor,
    RetrofitZone,
    /// Untyped sensor; classified by name heuristic.
    Sensor,

    // Security system
    BaseStation,
    BaseStationPro,
    Keypad,
    SecurityPanel,
    PanicButton,
    Siren,
    SirenOutdoor,

    // Alarms
    SmokeAlarm,
    CoAlarm,
    SmokeCoListener,

    // Switches and lighting
    MultiLevelSwitch,
    MultiLevelBulb,
    Switch,
    BeamsMotionSensor,
    BeamsMultiLevelSwitch,
    BeamsTransformerSwitch,
    BeamsLightGroupSwitch,
    BeamsDevice,

    // Climate and water
    Thermostat,
    WaterValve,

    // Infrastructure
    MeshAdapter,
    ZigbeeAdapter,
    ZWaveAdapter,
    ZWaveExtender,
    RetrofitBridge,
    CodeVault,
    AccessCode,
    UnknownZWave,

    // Synthetic
    LocationMode,

    /// Anything the directory reports that has no dedicated variant.
    Other(String),
}

impl DeviceType {
    /// The dedicated variant for a known wire tag.
    fn known(raw: &str) -> Option<Self> {
        Some(match raw {
            "sensor.contact" => Self::ContactSensor,
            "sensor.motion" => Self::MotionSensor,
            "sensor.flood-freeze" => Self::FloodFreezeSensor,
            "sensor.freeze" => Self::FreezeSensor,
            "sensor.temperature" => Self::TemperatureSensor,
            "sensor.water" => Self::WaterSensor,
            "sensor.tilt" => Self::TiltSensor,
            "sensor.glassbreak" => Self::GlassbreakSensor,
            "sensor.zone" => Self::RetrofitZone,
            "sensor" => Self::Sensor,
            "hub.redsky" => Self::BaseStation,
            "hub.kili" => Self::BaseStationPro,
            "security-keypad" => Self::Keypad,
            "security-panel" => Self::SecurityPanel,
            "security-panic" => Self::PanicButton,
            "siren" => Self::Siren,
            "siren.outdoor" => Self::SirenOutdoor,
            "alarm.smoke" => Self::SmokeAlarm,
            "alarm.co" => Self::CoAlarm,
            "listener.smoke-co" => Self::SmokeCoListener,
            "switch.multilevel" => Self::MultiLevelSwitch,
            "switch.multilevel.bulb" => Self::MultiLevelBulb,
            "switch" => Self::Switch,
            "motion-sensor.beams" => Self::BeamsMotionSensor,
            "switch.multilevel.beams" => Self::BeamsMultiLevelSwitch,
            "switch.transformer.beams" => Self::BeamsTransformerSwitch,
            "group.light-group.beams" => Self::BeamsLightGroupSwitch,
            "device.beams" => Self::BeamsDevice,
            "temperature-control.thermostat" => Self::Thermostat,
            "valve.water" => Self::WaterValve,
            "adapter.mesh" => Self::MeshAdapter,
            "adapter.zigbee" => Self::ZigbeeAdapter,
            "adapter.zwave" => Self::ZWaveAdapter,
            "range-extender.zwave" => Self::ZWaveExtender,
            "bridge.flatline" => Self::RetrofitBridge,
            "access-code.vault" => Self::CodeVault,
            "access-code" => Self::AccessCode,
            "unknown.zwave" => Self::UnknownZWave,
            "location.mode" => Self::LocationMode,
            _ => return None,
        })
    }

    /// The directory's wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ContactSensor => "sensor.contact",
            Self::MotionSensor => "sensor.motion",
            Self::FloodFreezeSensor => "sensor.flood-freeze",
            Self::FreezeSensor => "sensor.freeze",
            Self::TemperatureSensor => "sensor.temperature",
            Self::WaterSensor => "sensor.water",
            Self::TiltSensor => "sensor.tilt",
            Self::GlassbreakSensor => "sensor.glassbreak",
            Self::RetrofitZone => "sensor.zone",
            Self::Sensor => "sensor",
            Self::BaseStation => "hub.redsky",
            Self::BaseStationPro => "hub.kili",
            Self::Keypad => "security-keypad",
            Self::SecurityPanel => "security-panel",
            Self::PanicButton => "security-panic",
            Self::Siren => "siren",
            Self::SirenOutdoor => "siren.outdoor",
            Self::SmokeAlarm => "alarm.smoke",
            Self::CoAlarm => "alarm.co",
            Self::SmokeCoListener => "listener.smoke-co",
            Self::MultiLevelSwitch => "switch.multilevel",
            Self::MultiLevelBulb => "switch.multilevel.bulb",
            Self::Switch => "switch",
            Self::BeamsMotionSensor => "motion-sensor.beams",
            Self::BeamsMultiLevelSwitch => "switch.multilevel.beams",
            Self::BeamsTransformerSwitch => "switch.transformer.beams",
            Self::BeamsLightGroupSwitch => "group.light-group.beams",
            Self::BeamsDevice => "device.beams",
            Self::Thermostat => "temperature-control.thermostat",
            Self::WaterValve => "valve.water",
            Self::MeshAdapter => "adapter.mesh",
            Self::ZigbeeAdapter => "adapter.zigbee",
            Self::ZWaveAdapter => "adapter.zwave",
            Self::ZWaveExtender => "range-extender.zwave",
            Self::RetrofitBridge => "bridge.flatline",
            Self::CodeVault => "access-code.vault",
            Self::AccessCode => "access-code",
            Self::UnknownZWave => "unknown.zwave",
            Self::LocationMode => "location.mode",
            Self::Other(raw) => raw,
        }
    }

    /// `lock`, or `lock.` followed by a sub-variant (e.g. `lock.schedule`).
    pub fn is_lock(&self) -> bool {
        let raw = self.as_str();
        raw.strip_prefix("lock")
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for DeviceType {
    fn from(raw: String) -> Self {
        Self::known(&raw).unwrap_or(Self::Other(raw))
    }
}

impl From<&str> for DeviceType {
    fn from(raw: &str) -> Self {
        Self::known(raw).unwrap_or_else(|| Self::Other(raw.to_owned()))
    }
}

impl From<DeviceType> for String {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

// ── CategoryId ──────────────────────────────────────────────────────

/// Directory category, used to disambiguate switch-like device types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl CategoryId {
    pub const OUTLETS: Self = Self(1);
    pub const LIGHTS: Self = Self(2);
    pub const SENSORS: Self = Self(5);
    pub const APPLIANCES: Self = Self(7);
    pub const LOCKS: Self = Self(10);
    pub const THERMOSTATS: Self = Self(11);
    pub const CAMERAS: Self = Self(12);
    pub const ALARMS: Self = Self(15);
    pub const FANS: Self = Self(17);
    pub const SECURITY: Self = Self(22);
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── DeviceStatus ────────────────────────────────────────────────────

/// Directory-reported lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    Disabled,
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }
}

// ── DeviceKind ──────────────────────────────────────────────────────

/// Structural kind of an entry. Cameras, chimes, and intercoms come from
/// their own directory collections; synthetic kinds are injected by the
/// engine and never reported by the directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    #[default]
    Directory,
    Camera,
    Chime,
    Intercom,
    Synthetic(SyntheticKind),
}

impl DeviceKind {
    pub fn is_camera(self) -> bool {
        matches!(self, Self::Camera)
    }
}

/// Engine-internal virtual devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntheticKind {
    /// Aggregate panic-button accessory bound to a security panel.
    PanicButtons,
    /// Location-wide mode switch.
    LocationMode,
}

// ── RemoteDevice ────────────────────────────────────────────────────

/// One device as reported by the directory for a single location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDevice {
    #[serde(default)]
    pub kind: DeviceKind,
    pub id: String,
    pub name: String,
    pub device_type: DeviceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub location_id: String,
}

impl RemoteDevice {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        device_type: impl Into<DeviceType>,
    ) -> Self {
        Self {
            kind: DeviceKind::Directory,
            id: id.into(),
            name: name.into(),
            device_type: device_type.into(),
            category_id: None,
            status: DeviceStatus::Active,
            location_id: String::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: DeviceKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn in_location(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = location_id.into();
        self
    }
}
