// ── Accessory domain types ──

use serde::{Deserialize, Serialize};

use super::identity::AccessoryId;

/// Accessory behavior class a device is materialized as.
///
/// Closed set: adding a variant forces every exhaustive match in the
/// classifier and placement logic to be revisited.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[non_exhaustive]
pub enum AccessoryVariant {
    // Sensors
    ContactSensor,
    MotionSensor,
    FloodFreezeSensor,
    FreezeSensor,
    TemperatureSensor,
    WaterSensor,

    // Security system
    SecurityPanel,
    BaseStation,
    Keypad,
    Siren,
    Lock,
    PanicButtons,

    // Alarms
    SmokeAlarm,
    CoAlarm,
    SmokeCoListener,

    // Switches and lighting
    Switch,
    Outlet,
    MultiLevelSwitch,
    MultiLevelBulb,
    Fan,
    Beam,
    UnknownZWaveSwitch,

    // Climate and water
    Thermostat,
    WaterValve,

    // Cameras and doorbell peripherals
    Camera,
    Chime,
    Intercom,

    // Location-wide
    LocationModeSwitch,
}

impl AccessoryVariant {
    /// Camera-class accessories are the only ones eligible for external placement.
    pub fn is_camera(self) -> bool {
        matches!(self, Self::Camera)
    }

    pub fn host_category(self) -> HostCategory {
        if self.is_camera() {
            HostCategory::Camera
        } else {
            HostCategory::SecuritySystem
        }
    }
}

/// Icon/category hint passed to the host when constructing an accessory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum HostCategory {
    #[default]
    SecuritySystem,
    Camera,
}

/// Where an accessory is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Placement {
    /// Shares the bridge's pairing; persisted in the host registry.
    Bridged,
    /// Published as an independently paired accessory; never cached.
    External,
}

/// An accessory record as the host registry stores it.
///
/// `context` is host-managed state. The engine sets it to an empty object
/// on creation and never touches it on reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAccessory {
    #[serde(rename = "UUID", alias = "id")]
    pub id: AccessoryId,
    pub display_name: String,
    #[serde(default)]
    pub category: HostCategory,
    #[serde(default = "empty_context")]
    pub context: serde_json::Value,
}

fn empty_context() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl PlatformAccessory {
    /// Accessory construction primitive.
    pub fn new(display_name: impl Into<String>, id: AccessoryId, category: HostCategory) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            category,
            context: empty_context(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_cameras_get_camera_category() {
        assert_eq!(AccessoryVariant::Camera.host_category(), HostCategory::Camera);
        assert_eq!(AccessoryVariant::Chime.host_category(), HostCategory::SecuritySystem);
        assert_eq!(AccessoryVariant::Lock.host_category(), HostCategory::SecuritySystem);
    }

    #[test]
    fn accessory_record_keeps_opaque_context() {
        let json = r#"{
            "UUID": "550e8400-e29b-41d4-a716-446655440000",
            "displayName": "Front Door",
            "context": { "battery": 80 }
        }"#;
        let acc: PlatformAccessory = serde_json::from_str(json).unwrap();
        assert_eq!(acc.category, HostCategory::SecuritySystem);
        assert_eq!(acc.context["battery"], 80);

        let back = serde_json::to_value(&acc).unwrap();
        assert_eq!(back["UUID"], "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(back["context"]["battery"], 80);
    }

    #[test]
    fn new_accessory_has_empty_context() {
        let id = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        let acc = PlatformAccessory::new("Porch", id, HostCategory::Camera);
        assert!(acc.context.as_object().unwrap().is_empty());
    }
}
