//! Fixture-backed directory.
//!
//! [`SnapshotDirectory`] serves locations and devices from a JSON document
//! instead of a live service. It is what the `homelink` binary reconciles
//! against, and what the integration tests drive.
//!
//! ```json
//! {
//!   "locations": [
//!     {
//!       "id": "loc-1",
//!       "name": "Home",
//!       "supportsModeSwitching": true,
//!       "devices": [{ "id": "d1", "name": "Front Door", "deviceType": "sensor.contact" }],
//!       "cameras": [{ "id": "c1", "name": "Porch", "deviceType": "doorbell_v4" }]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use crate::device::{DeviceKind, RemoteDevice};
use crate::error::Error;
use crate::location::{DeviceDirectory, Location};
use crate::rotation::RefreshTokenRotation;

const ROTATION_CHANNEL_CAPACITY: usize = 16;

// ── Snapshot document ───────────────────────────────────────────────

/// Root of a directory snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub locations: Vec<LocationSnapshot>,
}

/// One location in a snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub supports_mode_switching: bool,
    /// Simulates a location whose device listing fails.
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub devices: Vec<RemoteDevice>,
    #[serde(default)]
    pub cameras: Vec<RemoteDevice>,
    #[serde(default)]
    pub chimes: Vec<RemoteDevice>,
    #[serde(default)]
    pub intercoms: Vec<RemoteDevice>,
}

// ── SnapshotLocation ────────────────────────────────────────────────

struct SnapshotLocation {
    inner: LocationSnapshot,
}

impl SnapshotLocation {
    /// Stamp the owning location and structural kind onto each entry.
    fn stamp(&self, devices: &[RemoteDevice], kind: DeviceKind) -> Vec<RemoteDevice> {
        devices
            .iter()
            .cloned()
            .map(|d| d.with_kind(kind).in_location(self.inner.id.clone()))
            .collect()
    }
}

#[async_trait]
impl Location for SnapshotLocation {
    fn id(&self) -> &str {
        &self.inner.id
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    async fn devices(&self) -> Result<Vec<RemoteDevice>, Error> {
        if self.inner.offline {
            return Err(Error::Connection {
                reason: format!("location {} did not answer the device listing", self.inner.id),
            });
        }
        Ok(self.stamp(&self.inner.devices, DeviceKind::Directory))
    }

    fn cameras(&self) -> Vec<RemoteDevice> {
        self.stamp(&self.inner.cameras, DeviceKind::Camera)
    }

    fn chimes(&self) -> Vec<RemoteDevice> {
        self.stamp(&self.inner.chimes, DeviceKind::Chime)
    }

    fn intercoms(&self) -> Vec<RemoteDevice> {
        self.stamp(&self.inner.intercoms, DeviceKind::Intercom)
    }

    async fn supports_location_mode_switching(&self) -> Result<bool, Error> {
        Ok(self.inner.supports_mode_switching)
    }
}

// ── SnapshotDirectory ───────────────────────────────────────────────

/// A [`DeviceDirectory`] backed by an in-memory [`DirectorySnapshot`].
pub struct SnapshotDirectory {
    locations: Vec<Arc<dyn Location>>,
    rotation_tx: broadcast::Sender<RefreshTokenRotation>,
    refresh_token: Mutex<Option<SecretString>>,
}

impl SnapshotDirectory {
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        let (rotation_tx, _) = broadcast::channel(ROTATION_CHANNEL_CAPACITY);
        let locations = snapshot
            .locations
            .into_iter()
            .map(|inner| Arc::new(SnapshotLocation { inner }) as Arc<dyn Location>)
            .collect();

        Self {
            locations,
            rotation_tx,
            refresh_token: Mutex::new(None),
        }
    }

    /// Parse a snapshot document from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let snapshot: DirectorySnapshot =
            serde_json::from_str(raw).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                source_name: "<inline>".into(),
            })?;
        Ok(Self::new(snapshot))
    }

    /// Load a snapshot document from disk.
    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let raw = tokio::fs::read_to_string(path).await?;
        let snapshot: DirectorySnapshot =
            serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                source_name: path.display().to_string(),
            })?;
        debug!(path = %path.display(), locations = snapshot.locations.len(), "loaded directory snapshot");
        Ok(Self::new(snapshot))
    }

    /// Seed the credential the directory considers current.
    #[must_use]
    pub fn with_refresh_token(self, token: SecretString) -> Self {
        Self {
            refresh_token: Mutex::new(Some(token)),
            ..self
        }
    }

    /// Rotate the refresh credential and notify subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    pub async fn rotate_refresh_token(&self, new: SecretString) -> usize {
        let old = self.refresh_token.lock().await.replace(new.clone());
        self.rotation_tx
            .send(RefreshTokenRotation::new(old, new))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DeviceDirectory for SnapshotDirectory {
    async fn locations(&self) -> Result<Vec<Arc<dyn Location>>, Error> {
        Ok(self.locations.clone())
    }

    fn refresh_token_rotations(&self) -> broadcast::Receiver<RefreshTokenRotation> {
        self.rotation_tx.subscribe()
    }
}
