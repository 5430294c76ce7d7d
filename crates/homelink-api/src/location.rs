// ── Directory boundary traits ──
//
// The directory service is consumed through these two traits. Transport
// and authentication live behind the implementation; the engine only
// sees locations, their device collections, and the capability probe.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::device::RemoteDevice;
use crate::error::Error;
use crate::rotation::RefreshTokenRotation;

/// One account location (a home, an office) and its devices.
#[async_trait]
pub trait Location: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Security-system and smart-home devices registered at this location.
    async fn devices(&self) -> Result<Vec<RemoteDevice>, Error>;

    /// Cameras and doorbells. Entries carry [`DeviceKind::Camera`](crate::DeviceKind::Camera).
    fn cameras(&self) -> Vec<RemoteDevice>;

    fn chimes(&self) -> Vec<RemoteDevice>;

    fn intercoms(&self) -> Vec<RemoteDevice>;

    /// Asynchronous capability probe for location-wide mode switching.
    async fn supports_location_mode_switching(&self) -> Result<bool, Error>;
}

/// Entry point into the remote device directory.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// All locations visible to the authenticated account.
    async fn locations(&self) -> Result<Vec<Arc<dyn Location>>, Error>;

    /// Subscribe to autonomous refresh-credential rotations.
    fn refresh_token_rotations(&self) -> broadcast::Receiver<RefreshTokenRotation>;
}
