// ── Accessory cache ──
//
// Owned identity -> record table mirroring the host registry. Insertion
// order follows the order the host replayed cached accessories, so stale
// batches and registry rewrites stay stable across runs.

use indexmap::IndexMap;

use crate::model::{AccessoryId, PlatformAccessory};

#[derive(Debug, Clone, Default)]
pub struct AccessoryCache {
    entries: IndexMap<AccessoryId, PlatformAccessory>,
}

impl AccessoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, accessory: PlatformAccessory) -> Option<PlatformAccessory> {
        self.entries.insert(accessory.id, accessory)
    }

    pub fn get(&self, id: &AccessoryId) -> Option<&PlatformAccessory> {
        self.entries.get(id)
    }

    pub fn remove(&mut self, id: &AccessoryId) -> Option<PlatformAccessory> {
        self.entries.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformAccessory> {
        self.entries.values()
    }

    pub fn to_vec(&self) -> Vec<PlatformAccessory> {
        self.entries.values().cloned().collect()
    }
}

impl FromIterator<PlatformAccessory> for AccessoryCache {
    fn from_iter<I: IntoIterator<Item = PlatformAccessory>>(iter: I) -> Self {
        let mut cache = Self::new();
        for accessory in iter {
            cache.insert(accessory);
        }
        cache
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{HostCategory, Role};
    use crate::resolver::IdentityResolver;

    fn record(device_id: &str) -> PlatformAccessory {
        let id = IdentityResolver::default().resolve(device_id, Role::Primary);
        PlatformAccessory::new(device_id, id, HostCategory::SecuritySystem)
    }

    #[test]
    fn keeps_insertion_order_after_removal() {
        let mut cache: AccessoryCache = ["a", "b", "c"].into_iter().map(record).collect();
        let b = record("b").id;
        assert!(cache.remove(&b).is_some());

        let names: Vec<_> = cache.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn insert_replaces_same_identity() {
        let mut cache = AccessoryCache::new();
        cache.insert(record("a"));
        let mut renamed = record("a");
        renamed.display_name = "Renamed".into();
        let previous = cache.insert(renamed).unwrap();

        assert_eq!(previous.display_name, "a");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.iter().next().unwrap().display_name, "Renamed");
    }
}
