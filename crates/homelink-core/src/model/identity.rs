// ── Core identity types ──
//
// AccessoryId is the reconciliation key shared by live devices and cached
// registry entries. MacAddress is the MAC-like address the host keys its
// per-accessory persisted artifacts on, derived from the AccessoryId.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use homelink_api::{DeviceKind, SyntheticKind};

// ── Role ────────────────────────────────────────────────────────────

/// Distinguishes accessories that share a base device id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Role {
    /// Plain directory device. Also the pre-migration camera role.
    Primary,
    Camera,
    #[serde(rename = "panic")]
    #[strum(serialize = "panic")]
    PanicButtons,
    #[serde(rename = "mode")]
    #[strum(serialize = "mode")]
    LocationMode,
}

impl Role {
    /// Suffix appended to the device id before hashing.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Primary => "",
            Self::Camera => "camera",
            Self::PanicButtons => "panic",
            Self::LocationMode => "mode",
        }
    }

    /// The role a device of this structural kind is keyed under.
    pub fn for_kind(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Directory | DeviceKind::Chime | DeviceKind::Intercom => Self::Primary,
            DeviceKind::Camera => Self::Camera,
            DeviceKind::Synthetic(SyntheticKind::PanicButtons) => Self::PanicButtons,
            DeviceKind::Synthetic(SyntheticKind::LocationMode) => Self::LocationMode,
        }
    }
}

// ── AccessoryId ─────────────────────────────────────────────────────

/// Stable, opaque accessory identity.
///
/// Always a name-based UUID; two derivations from the same seed string
/// produce the same value on every run and every host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// True when `raw` names this identity (case-insensitive).
    pub fn matches(&self, raw: &str) -> bool {
        Uuid::parse_str(raw.trim()).is_ok_and(|u| u == self.0)
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccessoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    /// Deterministic MAC-like address for an accessory: the first six
    /// bytes of the SHA-256 digest of its identity string.
    pub fn derive_from(id: &AccessoryId) -> Self {
        let digest = Sha256::digest(id.to_string().as_bytes());
        let octets: Vec<String> = digest.iter().take(6).map(|b| hex::encode([*b])).collect();
        Self(octets.join(":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase hex without separators, as used in artifact file names.
    pub fn compact_upper(&self) -> String {
        self.0.replace(':', "").to_uppercase()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_id() -> AccessoryId {
        "550e8400-e29b-41d4-a716-446655440000".parse().unwrap()
    }

    #[test]
    fn accessory_id_display() {
        assert_eq!(sample_id().to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn accessory_id_matches_ignores_case() {
        assert!(sample_id().matches("550E8400-E29B-41D4-A716-446655440000"));
        assert!(!sample_id().matches("not-a-uuid"));
    }

    #[test]
    fn role_suffixes() {
        assert_eq!(Role::Primary.suffix(), "");
        assert_eq!(Role::Camera.suffix(), "camera");
        assert_eq!(Role::for_kind(DeviceKind::Camera), Role::Camera);
        assert_eq!(
            Role::for_kind(DeviceKind::Synthetic(SyntheticKind::LocationMode)),
            Role::LocationMode
        );
    }

    #[test]
    fn role_parses_cli_names() {
        assert_eq!("panic".parse::<Role>().unwrap(), Role::PanicButtons);
        assert_eq!("mode".parse::<Role>().unwrap(), Role::LocationMode);
        assert_eq!("camera".parse::<Role>().unwrap(), Role::Camera);
    }

    #[test]
    fn mac_address_normalizes_dashes() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn derived_mac_is_stable_and_well_formed() {
        let a = MacAddress::derive_from(&sample_id());
        let b = MacAddress::derive_from(&sample_id());
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 17);
        assert_eq!(a.as_str().split(':').count(), 6);
        assert_eq!(a.compact_upper().len(), 12);
    }

    #[test]
    fn derived_mac_differs_per_identity() {
        let other: AccessoryId = "6ba7b810-9dad-11d1-80b4-00c04fd430c8".parse().unwrap();
        assert_ne!(
            MacAddress::derive_from(&sample_id()),
            MacAddress::derive_from(&other)
        );
    }
}
