// ── Device classifier ──
//
// Pure mapping from a directory descriptor to an accessory variant.
// Structural kind wins over the type tag; disabled devices never map.

use homelink_api::{CategoryId, DeviceKind, DeviceType, RemoteDevice, SyntheticKind};

use crate::model::AccessoryVariant;

/// Classify one device, or `None` when it has no accessory behavior.
pub fn classify(device: &RemoteDevice) -> Option<AccessoryVariant> {
    if device.status.is_disabled() {
        return None;
    }

    match device.kind {
        DeviceKind::Camera => Some(AccessoryVariant::Camera),
        DeviceKind::Chime => Some(AccessoryVariant::Chime),
        DeviceKind::Intercom => Some(AccessoryVariant::Intercom),
        DeviceKind::Synthetic(SyntheticKind::PanicButtons) => Some(AccessoryVariant::PanicButtons),
        DeviceKind::Synthetic(SyntheticKind::LocationMode) => {
            Some(AccessoryVariant::LocationModeSwitch)
        }
        DeviceKind::Directory => classify_type(device),
    }
}

fn classify_type(device: &RemoteDevice) -> Option<AccessoryVariant> {
    let variant = match &device.device_type {
        DeviceType::ContactSensor
        | DeviceType::RetrofitZone
        | DeviceType::TiltSensor
        | DeviceType::GlassbreakSensor => AccessoryVariant::ContactSensor,
        DeviceType::MotionSensor | DeviceType::BeamsMotionSensor => AccessoryVariant::MotionSensor,
        DeviceType::FloodFreezeSensor => AccessoryVariant::FloodFreezeSensor,
        DeviceType::FreezeSensor => AccessoryVariant::FreezeSensor,
        DeviceType::TemperatureSensor => AccessoryVariant::TemperatureSensor,
        DeviceType::WaterSensor => AccessoryVariant::WaterSensor,
        DeviceType::Sensor => generic_sensor(&device.name),

        DeviceType::SecurityPanel => AccessoryVariant::SecurityPanel,
        DeviceType::BaseStation | DeviceType::BaseStationPro => AccessoryVariant::BaseStation,
        DeviceType::Keypad => AccessoryVariant::Keypad,
        DeviceType::Siren | DeviceType::SirenOutdoor => AccessoryVariant::Siren,

        DeviceType::SmokeAlarm => AccessoryVariant::SmokeAlarm,
        DeviceType::CoAlarm => AccessoryVariant::CoAlarm,
        DeviceType::SmokeCoListener => AccessoryVariant::SmokeCoListener,

        DeviceType::MultiLevelSwitch => {
            if device.category_id == Some(CategoryId::FANS) {
                AccessoryVariant::Fan
            } else {
                AccessoryVariant::MultiLevelSwitch
            }
        }
        DeviceType::Switch => {
            if device.category_id == Some(CategoryId::OUTLETS) {
                AccessoryVariant::Outlet
            } else {
                AccessoryVariant::Switch
            }
        }
        DeviceType::MultiLevelBulb => AccessoryVariant::MultiLevelBulb,
        DeviceType::BeamsMultiLevelSwitch
        | DeviceType::BeamsTransformerSwitch
        | DeviceType::BeamsLightGroupSwitch => AccessoryVariant::Beam,
        DeviceType::UnknownZWave => AccessoryVariant::UnknownZWaveSwitch,

        DeviceType::Thermostat => AccessoryVariant::Thermostat,
        DeviceType::WaterValve => AccessoryVariant::WaterValve,

        DeviceType::LocationMode => AccessoryVariant::LocationModeSwitch,

        other if other.is_lock() => AccessoryVariant::Lock,

        // Raw panic entries, infrastructure, and anything unrecognized.
        DeviceType::PanicButton
        | DeviceType::BeamsDevice
        | DeviceType::MeshAdapter
        | DeviceType::ZigbeeAdapter
        | DeviceType::ZWaveAdapter
        | DeviceType::ZWaveExtender
        | DeviceType::RetrofitBridge
        | DeviceType::CodeVault
        | DeviceType::AccessCode
        | DeviceType::Other(_) => return None,
    };

    Some(variant)
}

/// Best-effort guess for untyped sensors: the directory gives no subtype,
/// so the display name decides.
fn generic_sensor(name: &str) -> AccessoryVariant {
    if name.to_lowercase().contains("motion") {
        AccessoryVariant::MotionSensor
    } else {
        AccessoryVariant::ContactSensor
    }
}
