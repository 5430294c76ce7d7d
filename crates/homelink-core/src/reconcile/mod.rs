// ── Reconciliation engine ──
//
// Pure three-way diff between the live classified device set and the
// cached registry table. Returns a plan; the caller issues the batched
// host calls and updates the table.

pub mod cache;
pub mod scan;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use homelink_api::RemoteDevice;

use crate::config::PlatformConfig;
use crate::model::{AccessoryVariant, MacAddress, Placement, PlatformAccessory};
use crate::visibility::HiddenReason;

pub use cache::AccessoryCache;
pub use scan::{ClassifiedDevice, HiddenDevice, LocationScan};

/// A live device bound to the accessory record that represents it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessoryBinding {
    pub variant: AccessoryVariant,
    pub placement: Placement,
    pub device: RemoteDevice,
    pub accessory: PlatformAccessory,
}

/// Outcome of one reconciliation, before any host call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcilePlan {
    /// Cached bridged accessories matched by a live device.
    pub reuse: Vec<AccessoryBinding>,
    /// New bridged accessories; one registration batch.
    pub create: Vec<AccessoryBinding>,
    /// Accessories for independent publication; one publish batch.
    pub external: Vec<AccessoryBinding>,
    /// Cached bridged entries whose device now requires external placement.
    /// Unregistered in a batch of their own, before any publish and apart
    /// from `stale`.
    pub deregister: Vec<PlatformAccessory>,
    /// Cached entries with no live, visible device.
    pub stale: Vec<PlatformAccessory>,
    /// Legacy artifact keys for newly created bridged cameras.
    pub purge: Vec<MacAddress>,
    /// Live devices that lost an identity collision this pass.
    pub duplicates: Vec<HiddenDevice>,
}

impl ReconcilePlan {
    /// True when applying the plan would not call the host at all.
    pub fn is_noop(&self) -> bool {
        self.create.is_empty()
            && self.external.is_empty()
            && self.deregister.is_empty()
            && self.stale.is_empty()
    }

    /// Registry contents once the plan is applied: reused plus created.
    pub fn registry_after(&self) -> Vec<PlatformAccessory> {
        self.reuse
            .iter()
            .chain(&self.create)
            .map(|binding| binding.accessory.clone())
            .collect()
    }
}

/// Diff the live set against the cache.
///
/// `live` must already be classified and filtered. The first device to
/// claim an identity wins; later claimants land in `duplicates`.
pub fn reconcile(
    live: impl IntoIterator<Item = ClassifiedDevice>,
    cache: &AccessoryCache,
    config: &PlatformConfig,
) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();
    let mut seen = HashSet::new();

    for ClassifiedDevice {
        id,
        variant,
        device,
    } in live
    {
        if !seen.insert(id) {
            plan.duplicates.push(HiddenDevice {
                id,
                variant: Some(variant),
                reason: HiddenReason::DuplicateIdentity,
                device,
            });
            continue;
        }

        let cached = cache.get(&id);

        if variant.is_camera() && config.unbridge_cameras {
            if let Some(bridged) = cached {
                debug!(id = %id, device = %device.name, "camera moving from bridged to external");
                plan.deregister.push(bridged.clone());
            }
            let accessory = PlatformAccessory::new(device.name.clone(), id, variant.host_category());
            plan.external.push(AccessoryBinding {
                variant,
                placement: Placement::External,
                device,
                accessory,
            });
            continue;
        }

        match cached {
            Some(existing) => plan.reuse.push(AccessoryBinding {
                variant,
                placement: Placement::Bridged,
                device,
                accessory: existing.clone(),
            }),
            None => {
                if variant.is_camera() {
                    plan.purge.push(MacAddress::derive_from(&id));
                }
                let accessory =
                    PlatformAccessory::new(device.name.clone(), id, variant.host_category());
                plan.create.push(AccessoryBinding {
                    variant,
                    placement: Placement::Bridged,
                    device,
                    accessory,
                });
            }
        }
    }

    plan.stale = cache
        .iter()
        .filter(|accessory| !seen.contains(&accessory.id))
        .cloned()
        .collect();

    plan
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homelink_api::DeviceKind;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AccessoryId, HostCategory, Role};
    use crate::resolver::IdentityResolver;

    fn live(device: RemoteDevice, variant: AccessoryVariant) -> ClassifiedDevice {
        ClassifiedDevice {
            id: IdentityResolver::default().resolve_device(&device),
            variant,
            device,
        }
    }

    fn door(id: &str) -> ClassifiedDevice {
        live(
            RemoteDevice::new(id, format!("Door {id}"), "sensor.contact"),
            AccessoryVariant::ContactSensor,
        )
    }

    fn camera(id: &str) -> ClassifiedDevice {
        live(
            RemoteDevice::new(id, "Porch", "doorbell_v4").with_kind(DeviceKind::Camera),
            AccessoryVariant::Camera,
        )
    }

    fn cached(id: AccessoryId, name: &str) -> PlatformAccessory {
        PlatformAccessory::new(name, id, HostCategory::SecuritySystem)
    }

    #[test]
    fn empty_cache_creates_everything() {
        let plan = reconcile(
            vec![door("a"), door("b")],
            &AccessoryCache::new(),
            &PlatformConfig::default(),
        );
        assert_eq!(plan.create.len(), 2);
        assert!(plan.reuse.is_empty());
        assert!(plan.stale.is_empty());
        assert!(!plan.is_noop());
    }

    #[test]
    fn second_pass_reuses_and_preserves_context() {
        let first = reconcile(vec![door("a")], &AccessoryCache::new(), &PlatformConfig::default());
        let mut record = first.create[0].accessory.clone();
        record.context = serde_json::json!({ "battery": 42 });
        let cache: AccessoryCache = [record].into_iter().collect();

        let second = reconcile(vec![door("a")], &cache, &PlatformConfig::default());
        assert!(second.create.is_empty());
        assert_eq!(second.reuse.len(), 1);
        assert_eq!(second.reuse[0].accessory.context["battery"], 42);
        assert!(second.is_noop());
    }

    #[test]
    fn absent_identity_is_stale_once() {
        let gone = IdentityResolver::default().resolve("gone", Role::Primary);
        let cache: AccessoryCache = [cached(gone, "Gone")].into_iter().collect();

        let plan = reconcile(vec![door("a")], &cache, &PlatformConfig::default());
        assert_eq!(plan.stale.len(), 1);
        assert_eq!(plan.stale[0].id, gone);
    }

    #[test]
    fn unbridged_camera_deregisters_cached_entry() {
        let cam = camera("c1");
        let cache: AccessoryCache = [cached(cam.id, "Porch")].into_iter().collect();
        let config = PlatformConfig {
            unbridge_cameras: true,
            ..PlatformConfig::default()
        };

        let plan = reconcile(vec![cam.clone()], &cache, &config);
        assert_eq!(plan.deregister.len(), 1);
        assert_eq!(plan.external.len(), 1);
        assert_eq!(plan.external[0].placement, Placement::External);
        assert_eq!(plan.external[0].accessory.category, HostCategory::Camera);
        assert!(plan.reuse.is_empty());
        assert!(plan.create.is_empty());
        assert!(plan.stale.is_empty());
        assert!(plan.registry_after().is_empty());
    }

    #[test]
    fn new_bridged_camera_schedules_artifact_purge() {
        let cam = camera("c1");
        let plan = reconcile(vec![cam.clone()], &AccessoryCache::new(), &PlatformConfig::default());
        assert_eq!(plan.purge, vec![MacAddress::derive_from(&cam.id)]);
        assert_eq!(plan.create[0].accessory.category, HostCategory::Camera);
    }

    #[test]
    fn legacy_camera_identity_goes_stale() {
        let legacy = IdentityResolver::default().resolve("c1", Role::Primary);
        let cache: AccessoryCache = [cached(legacy, "Porch")].into_iter().collect();

        let plan = reconcile(vec![camera("c1")], &cache, &PlatformConfig::default());
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.stale.len(), 1);
        assert_eq!(plan.stale[0].id, legacy);
    }

    #[test]
    fn duplicate_identity_first_wins() {
        let plan = reconcile(
            vec![door("a"), door("a")],
            &AccessoryCache::new(),
            &PlatformConfig::default(),
        );
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.duplicates.len(), 1);
        assert_eq!(plan.duplicates[0].reason, HiddenReason::DuplicateIdentity);
    }
}
