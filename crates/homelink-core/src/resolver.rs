// ── Identity resolver ──
//
// Name-based UUIDs over `prefix + device_id + role_suffix`. The namespace
// is fixed forever: changing it re-keys every accessory a user has paired.

use uuid::Uuid;

use homelink_api::RemoteDevice;

use crate::config::PlatformConfig;
use crate::model::{AccessoryId, Role};

const IDENTITY_NAMESPACE: Uuid = Uuid::from_u128(0x8f3c_2a61_5d0e_4b7a_9c1f_6e2d_4a8b_3c70);

/// Derives accessory identities for one prefix mode.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    prefix: String,
}

impl IdentityResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(config.identity_prefix())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn resolve(&self, device_id: &str, role: Role) -> AccessoryId {
        let seed = format!("{}{}{}", self.prefix, device_id, role.suffix());
        AccessoryId::from_uuid(Uuid::new_v5(&IDENTITY_NAMESPACE, seed.as_bytes()))
    }

    /// Identity of a device under the role implied by its structural kind.
    pub fn resolve_device(&self, device: &RemoteDevice) -> AccessoryId {
        self.resolve(&device.id, Role::for_kind(device.kind))
    }
}
