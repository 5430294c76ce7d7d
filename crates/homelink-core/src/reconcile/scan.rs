// ── Per-location scan ──
//
// Classification, identity resolution, and visibility for one location's
// augmented device list. Synchronous and side-effect free.

use serde::Serialize;

use homelink_api::RemoteDevice;

use crate::classify::classify;
use crate::config::PlatformConfig;
use crate::model::{AccessoryId, AccessoryVariant};
use crate::resolver::IdentityResolver;
use crate::visibility::{HiddenReason, Visibility, is_quiet_type, visibility};

/// A live device that passed every filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedDevice {
    pub id: AccessoryId,
    pub variant: AccessoryVariant,
    pub device: RemoteDevice,
}

/// A device excluded from the registry, with the rule that excluded it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenDevice {
    pub id: AccessoryId,
    pub variant: Option<AccessoryVariant>,
    pub reason: HiddenReason,
    pub device: RemoteDevice,
}

impl HiddenDevice {
    /// Infrastructure entries are excluded without a user-facing notice.
    pub fn is_quiet(&self) -> bool {
        is_quiet_type(&self.device.device_type)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationScan {
    pub location_id: String,
    pub location_name: String,
    pub visible: Vec<ClassifiedDevice>,
    pub hidden: Vec<HiddenDevice>,
}

impl LocationScan {
    pub fn build(
        location_id: impl Into<String>,
        location_name: impl Into<String>,
        devices: Vec<RemoteDevice>,
        resolver: &IdentityResolver,
        config: &PlatformConfig,
    ) -> Self {
        let mut scan = Self {
            location_id: location_id.into(),
            location_name: location_name.into(),
            ..Self::default()
        };

        for device in devices {
            let variant = classify(&device);
            let id = resolver.resolve_device(&device);
            match (visibility(&device, variant, &id, config), variant) {
                (Visibility::Visible, Some(variant)) => {
                    scan.visible.push(ClassifiedDevice { id, variant, device });
                }
                (Visibility::Hidden(reason), _) => {
                    scan.hidden.push(HiddenDevice {
                        id,
                        variant,
                        reason,
                        device,
                    });
                }
                (Visibility::Visible, None) => scan.hidden.push(HiddenDevice {
                    id,
                    variant,
                    reason: HiddenReason::Unsupported,
                    device,
                }),
            }
        }

        scan
    }

    pub fn device_count(&self) -> usize {
        self.visible.len() + self.hidden.len()
    }
}

#[cfg(test)]
mod tests {
    use homelink_api::DeviceStatus;

    use super::*;

    #[test]
    fn splits_visible_and_hidden() {
        let devices = vec![
            RemoteDevice::new("d1", "Door", "sensor.contact"),
            RemoteDevice::new("d2", "Old Door", "sensor.contact").with_status(DeviceStatus::Disabled),
            RemoteDevice::new("a1", "Mesh", "adapter.mesh"),
        ];
        let scan = LocationScan::build(
            "loc-1",
            "Home",
            devices,
            &IdentityResolver::default(),
            &PlatformConfig::default(),
        );

        assert_eq!(scan.visible.len(), 1);
        assert_eq!(scan.visible[0].variant, AccessoryVariant::ContactSensor);
        assert_eq!(scan.hidden.len(), 2);
        assert!(scan.hidden.iter().all(|h| h.reason == HiddenReason::Unsupported));
        assert!(!scan.hidden[0].is_quiet());
        assert!(scan.hidden[1].is_quiet());
        assert_eq!(scan.device_count(), 3);
    }
}
