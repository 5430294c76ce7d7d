// ── Visibility filter ──
//
// Decides whether a classified device is materialized. Hidden devices are
// excluded from the registry entirely; the reason is kept for reporting.

use serde::Serialize;

use homelink_api::{DeviceType, RemoteDevice};

use crate::config::PlatformConfig;
use crate::model::{AccessoryId, AccessoryVariant};

/// Why a device was left out of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum HiddenReason {
    /// No accessory variant exists for the device.
    Unsupported,
    LightGroup,
    HideList,
    TypeFilter,
    /// Another device already claimed the identity this pass.
    DuplicateIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden(HiddenReason),
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Evaluate every exclusion rule in order; the first match names the reason.
pub fn visibility(
    device: &RemoteDevice,
    variant: Option<AccessoryVariant>,
    id: &AccessoryId,
    config: &PlatformConfig,
) -> Visibility {
    if variant.is_none() {
        return Visibility::Hidden(HiddenReason::Unsupported);
    }
    if config.hide_light_groups && device.device_type == DeviceType::BeamsLightGroupSwitch {
        return Visibility::Hidden(HiddenReason::LightGroup);
    }
    if config.is_hidden_id(id) {
        return Visibility::Hidden(HiddenReason::HideList);
    }
    if !config.admits_type(&device.device_type) {
        return Visibility::Hidden(HiddenReason::TypeFilter);
    }
    Visibility::Visible
}

/// Adapter and placeholder types that are always excluded without a notice.
pub fn is_quiet_type(device_type: &DeviceType) -> bool {
    matches!(
        device_type,
        DeviceType::MeshAdapter
            | DeviceType::ZigbeeAdapter
            | DeviceType::ZWaveAdapter
            | DeviceType::ZWaveExtender
            | DeviceType::RetrofitBridge
            | DeviceType::CodeVault
            | DeviceType::AccessCode
            | DeviceType::BeamsDevice
            | DeviceType::PanicButton
    )
}
