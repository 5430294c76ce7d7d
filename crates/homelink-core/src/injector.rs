// ── Synthetic device injector ──
//
// Appends engine-internal devices to a location's raw listing. Synthetic
// entries carry a `DeviceKind::Synthetic` tag, so the classifier maps
// them directly and the resolver keys them under their own role.

use tracing::{debug, warn};

use homelink_api::{DeviceKind, DeviceType, Location, RemoteDevice, SyntheticKind};

use crate::config::PlatformConfig;

pub const PANIC_BUTTONS_NAME: &str = "Panic Buttons";

/// Return `devices` plus any synthetic entries the configuration and the
/// location's capabilities call for.
///
/// A failed capability probe is logged and treated as "unsupported"; it
/// never fails the pass.
pub async fn augment(
    mut devices: Vec<RemoteDevice>,
    location: &dyn Location,
    config: &PlatformConfig,
) -> Vec<RemoteDevice> {
    if config.show_panic_buttons {
        let panel = devices
            .iter()
            .find(|d| d.device_type == DeviceType::SecurityPanel)
            .map(|panel| panic_buttons_for(panel, location.id()));
        if let Some(panic) = panel {
            debug!(location = location.id(), panel = %panic.id, "adding panic buttons");
            devices.push(panic);
        }
    }

    if config.location_mode_polling().is_some() {
        match location.supports_location_mode_switching().await {
            Ok(true) => devices.push(location_mode_for(location)),
            Ok(false) => debug!(location = location.id(), "location mode switching not supported"),
            Err(e) => warn!(
                location = location.id(),
                error = %e,
                "location mode probe failed, skipping mode switch"
            ),
        }
    }

    devices
}

fn panic_buttons_for(panel: &RemoteDevice, location_id: &str) -> RemoteDevice {
    RemoteDevice::new(panel.id.clone(), PANIC_BUTTONS_NAME, DeviceType::PanicButton)
        .with_kind(DeviceKind::Synthetic(SyntheticKind::PanicButtons))
        .in_location(location_id)
}

fn location_mode_for(location: &dyn Location) -> RemoteDevice {
    RemoteDevice::new(
        location.id(),
        format!("{} Mode", location.name()),
        DeviceType::LocationMode,
    )
    .with_kind(DeviceKind::Synthetic(SyntheticKind::LocationMode))
    .in_location(location.id())
}
