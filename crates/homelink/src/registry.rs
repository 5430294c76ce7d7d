// ── File-backed accessory registry ──
//
// Stands in for the bridge runtime: bridged accessories persist as a JSON
// array, external publications are only recorded for the report, and
// legacy per-accessory files live under `<storage>/persist/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use homelink_core::{AccessoryHost, CoreError, MacAddress, PlatformAccessory};

use crate::error::CliError;

pub struct FileRegistry {
    /// `None` keeps the registry in memory only.
    path: Option<PathBuf>,
    storage: Option<PathBuf>,
    accessories: Mutex<Vec<PlatformAccessory>>,
    published: Mutex<Vec<PlatformAccessory>>,
}

impl FileRegistry {
    /// Open the registry at `path`. A missing file is an empty registry.
    pub async fn open(path: &Path, storage: Option<PathBuf>) -> Result<Self, CliError> {
        let accessories = match tokio::fs::read_to_string(path).await {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = accessories.len(), "opened accessory registry");

        Ok(Self {
            path: Some(path.to_path_buf()),
            storage,
            accessories: Mutex::new(accessories),
            published: Mutex::new(Vec::new()),
        })
    }

    /// An empty registry that is never written to disk.
    pub fn detached() -> Self {
        Self {
            path: None,
            storage: None,
            accessories: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
        }
    }

    pub async fn accessories(&self) -> Vec<PlatformAccessory> {
        self.accessories.lock().await.clone()
    }

    pub async fn published(&self) -> Vec<PlatformAccessory> {
        self.published.lock().await.clone()
    }

    /// Legacy artifact path for `mac`, if a storage directory is configured.
    pub fn artifact_path(&self, mac: &MacAddress) -> Option<PathBuf> {
        self.storage.as_ref().map(|dir| {
            dir.join("persist")
                .join(format!("AccessoryInfo.{}.json", mac.compact_upper()))
        })
    }

    async fn persist(
        &self,
        operation: &str,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let body = serde_json::to_string_pretty(accessories)
            .map_err(|e| CoreError::host(operation, e.to_string()))?;

        let name = path
            .file_name()
            .map_or_else(|| "registry".into(), |n| n.to_string_lossy().into_owned());
        let temp = path.with_file_name(format!(".{name}.tmp"));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::host(operation, format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| CoreError::host(operation, format!("{}: {e}", temp.display())))?;
        tokio::fs::rename(&temp, path)
            .await
            .map_err(|e| CoreError::host(operation, format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl AccessoryHost for FileRegistry {
    async fn register_platform_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        let mut table = self.accessories.lock().await;
        let mut next = table.clone();
        for accessory in accessories {
            next.retain(|a| a.id != accessory.id);
            next.push(accessory.clone());
        }
        self.persist("register", &next).await?;
        *table = next;
        Ok(())
    }

    async fn unregister_platform_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        let mut table = self.accessories.lock().await;
        let mut next = table.clone();
        next.retain(|a| !accessories.iter().any(|gone| gone.id == a.id));
        self.persist("unregister", &next).await?;
        *table = next;
        Ok(())
    }

    async fn publish_external_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        self.published.lock().await.extend_from_slice(accessories);
        Ok(())
    }

    async fn purge_accessory_artifacts(&self, mac: &MacAddress) -> Result<(), CoreError> {
        let Some(path) = self.artifact_path(mac) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "removed legacy accessory file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::host("purge", format!("{}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homelink_core::{HostCategory, IdentityResolver, Role};

    use super::*;

    fn accessory(device_id: &str, name: &str) -> PlatformAccessory {
        let id = IdentityResolver::new("").resolve(device_id, Role::Primary);
        PlatformAccessory::new(name, id, HostCategory::SecuritySystem)
    }

    #[tokio::test]
    async fn register_and_unregister_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accessories.json");
        let registry = FileRegistry::open(&path, None).await.unwrap();

        let a = accessory("door-1", "Front Door");
        let b = accessory("motion-1", "Hall Motion");
        registry
            .register_platform_accessories(&[a.clone(), b.clone()])
            .await
            .unwrap();
        registry.unregister_platform_accessories(&[a]).await.unwrap();

        let reopened = FileRegistry::open(&path, None).await.unwrap();
        assert_eq!(reopened.accessories().await, vec![b]);
    }

    #[tokio::test]
    async fn purge_removes_artifact_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let registry =
            FileRegistry::open(&dir.path().join("r.json"), Some(dir.path().to_path_buf()))
                .await
                .unwrap();
        let mac = MacAddress::new("0e:12:ab:cd:ef:01");
        let artifact = registry.artifact_path(&mac).unwrap();
        std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        std::fs::write(&artifact, "{}").unwrap();

        registry.purge_accessory_artifacts(&mac).await.unwrap();
        assert!(!artifact.exists());
        registry.purge_accessory_artifacts(&mac).await.unwrap();
    }
}
