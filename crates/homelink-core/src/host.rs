// ── Host registry boundary ──
//
// The bridge runtime that persists and exposes accessories. Every method
// takes a whole batch; the engine never issues per-accessory registry calls.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{MacAddress, PlatformAccessory};

#[async_trait]
pub trait AccessoryHost: Send + Sync {
    /// Add bridged accessories to the durable registry.
    async fn register_platform_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError>;

    /// Remove bridged accessories from the durable registry.
    async fn unregister_platform_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError>;

    /// Publish independently paired accessories. These are never cached.
    async fn publish_external_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError>;

    /// Delete any per-accessory state a previous generation left behind
    /// under `mac`. Missing artifacts are not an error.
    async fn purge_accessory_artifacts(&self, mac: &MacAddress) -> Result<(), CoreError>;
}
