// ── Runtime platform configuration ──
//
// Everything the engine reads from the user's platform section, already
// validated and typed. Never touches disk; homelink-config builds it.

use std::time::Duration;

use secrecy::SecretString;

use homelink_api::DeviceType;

use crate::model::AccessoryId;

/// Default polling interval for both location mode and camera status.
pub const DEFAULT_POLLING_SECONDS: u64 = 20;

/// Identity prefix applied in debug mode, so a test bridge never collides
/// with a production one.
pub const DEBUG_IDENTITY_PREFIX: &str = "TEST ";

#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlatformConfig {
    /// Refresh credential. A pass without one fails before contacting the directory.
    pub refresh_token: Option<SecretString>,
    /// Accessory identities to suppress.
    pub hide_device_ids: Vec<String>,
    /// Allow-list of directory type tags. Empty admits every type.
    pub only_device_types: Vec<String>,
    pub hide_light_groups: bool,
    pub show_panic_buttons: bool,
    /// Publish cameras as independently paired accessories.
    pub unbridge_cameras: bool,
    /// Zero disables the location-mode accessory entirely.
    pub location_mode_polling_seconds: u64,
    pub camera_status_polling_seconds: u64,
    pub disable_logs: bool,
    pub debug: bool,
    /// Allow-list of location ids. Empty admits every location.
    pub location_ids: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            refresh_token: None,
            hide_device_ids: Vec::new(),
            only_device_types: Vec::new(),
            hide_light_groups: false,
            show_panic_buttons: false,
            unbridge_cameras: false,
            location_mode_polling_seconds: DEFAULT_POLLING_SECONDS,
            camera_status_polling_seconds: DEFAULT_POLLING_SECONDS,
            disable_logs: false,
            debug: false,
            location_ids: Vec::new(),
        }
    }
}

impl PlatformConfig {
    /// Prefix folded into every identity seed.
    pub fn identity_prefix(&self) -> &'static str {
        if self.debug { DEBUG_IDENTITY_PREFIX } else { "" }
    }

    pub fn is_hidden_id(&self, id: &AccessoryId) -> bool {
        self.hide_device_ids.iter().any(|raw| id.matches(raw))
    }

    pub fn admits_type(&self, device_type: &DeviceType) -> bool {
        self.only_device_types.is_empty()
            || self
                .only_device_types
                .iter()
                .any(|tag| tag == device_type.as_str())
    }

    pub fn admits_location(&self, location_id: &str) -> bool {
        self.location_ids.is_empty() || self.location_ids.iter().any(|id| id == location_id)
    }

    /// `None` when location-mode support is switched off.
    pub fn location_mode_polling(&self) -> Option<Duration> {
        (self.location_mode_polling_seconds > 0)
            .then(|| Duration::from_secs(self.location_mode_polling_seconds))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_location_mode_polling() {
        let config = PlatformConfig::default();
        assert_eq!(config.location_mode_polling(), Some(Duration::from_secs(20)));
        assert_eq!(config.camera_status_polling_seconds, 20);
        assert_eq!(config.identity_prefix(), "");
    }

    #[test]
    fn zero_polling_disables_location_mode() {
        let config = PlatformConfig {
            location_mode_polling_seconds: 0,
            ..PlatformConfig::default()
        };
        assert!(config.location_mode_polling().is_none());
    }

    #[test]
    fn empty_type_filter_admits_everything() {
        let config = PlatformConfig::default();
        assert!(config.admits_type(&DeviceType::Siren));

        let filtered = PlatformConfig {
            only_device_types: vec!["sensor.contact".into()],
            ..PlatformConfig::default()
        };
        assert!(filtered.admits_type(&DeviceType::ContactSensor));
        assert!(!filtered.admits_type(&DeviceType::Siren));
    }

    #[test]
    fn hide_list_matches_any_case() {
        let id: AccessoryId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        let config = PlatformConfig {
            hide_device_ids: vec!["550E8400-E29B-41D4-A716-446655440000".into()],
            ..PlatformConfig::default()
        };
        assert!(config.is_hidden_id(&id));
    }

    #[test]
    fn debug_mode_uses_test_prefix() {
        let config = PlatformConfig {
            debug: true,
            ..PlatformConfig::default()
        };
        assert_eq!(config.identity_prefix(), "TEST ");
    }
}
