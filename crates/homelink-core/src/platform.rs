// ── Platform facade ──
//
// Owns the accessory cache and drives reconciliation passes:
//
//   1. host replays cached accessories via `configure_accessory`
//   2. `run_pass` scans every location concurrently, diffs the union
//      against the cache, then issues the batched host calls in order:
//      deregister transitions, purge, register, publish, unregister stale
//   3. the rotation listener runs alongside, independent of passes

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use homelink_api::{DeviceDirectory, Location};

use crate::config::PlatformConfig;
use crate::error::CoreError;
use crate::host::AccessoryHost;
use crate::injector;
use crate::log::{PlatformLog, log_for};
use crate::model::PlatformAccessory;
use crate::reconcile::{
    AccessoryBinding, AccessoryCache, HiddenDevice, LocationScan, ReconcilePlan, reconcile,
};
use crate::resolver::IdentityResolver;
use crate::rotation::{CredentialStore, RotationListener, RotationStats};
use crate::visibility::HiddenReason;

// ── PassReport ───────────────────────────────────────────────────

/// Device counts for one processed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationSummary {
    pub id: String,
    pub name: String,
    pub devices: usize,
    pub visible: usize,
    pub hidden: usize,
}

/// Everything one pass decided, and whether it was applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub applied: bool,
    pub locations: Vec<LocationSummary>,
    /// Devices excluded by the visibility filter.
    pub hidden: Vec<HiddenDevice>,
    pub plan: ReconcilePlan,
}

impl PassReport {
    /// Every live accessory this pass, bridged and external.
    pub fn bindings(&self) -> impl Iterator<Item = &AccessoryBinding> {
        self.plan
            .reuse
            .iter()
            .chain(&self.plan.create)
            .chain(&self.plan.external)
    }
}

// ── Platform ─────────────────────────────────────────────────────

/// Reconciliation entry point.
///
/// Cheaply cloneable via `Arc<PlatformInner>`. Passes are serialized on
/// the cache lock; the rotation listener never touches the cache.
#[derive(Clone)]
pub struct Platform {
    inner: Arc<PlatformInner>,
}

struct PlatformInner {
    config: PlatformConfig,
    resolver: IdentityResolver,
    directory: Arc<dyn DeviceDirectory>,
    host: Arc<dyn AccessoryHost>,
    log: Arc<dyn PlatformLog>,
    cache: Mutex<AccessoryCache>,
    last_pass: watch::Sender<Option<DateTime<Utc>>>,
    cancel: CancellationToken,
    rotation: Mutex<Option<RotationListener>>,
}

impl Platform {
    /// Build a platform with the log capability implied by `disable_logs`.
    pub fn new(
        config: PlatformConfig,
        directory: Arc<dyn DeviceDirectory>,
        host: Arc<dyn AccessoryHost>,
    ) -> Self {
        let log = log_for(&config);
        Self::with_log(config, directory, host, log)
    }

    pub fn with_log(
        config: PlatformConfig,
        directory: Arc<dyn DeviceDirectory>,
        host: Arc<dyn AccessoryHost>,
        log: Arc<dyn PlatformLog>,
    ) -> Self {
        let (last_pass, _) = watch::channel(None);
        let resolver = IdentityResolver::from_config(&config);

        Self {
            inner: Arc::new(PlatformInner {
                config,
                resolver,
                directory,
                host,
                log,
                cache: Mutex::new(AccessoryCache::new()),
                last_pass,
                cancel: CancellationToken::new(),
                rotation: Mutex::new(None),
            }),
        }
    }

    // ── Host callbacks ───────────────────────────────────────────

    /// Called by the host once per persisted accessory before the first pass.
    pub async fn configure_accessory(&self, accessory: PlatformAccessory) {
        debug!(id = %accessory.id, name = %accessory.display_name, "restoring cached accessory");
        let mut cache = self.inner.cache.lock().await;
        if cache.insert(accessory).is_some() {
            warn!("host replayed the same accessory twice; keeping the latest record");
        }
    }

    /// Host readiness signal: start the rotation listener (when a store is
    /// given) and run one pass. A failed pass is logged here; the error is
    /// returned for the caller to report, never panicked on.
    pub async fn did_finish_launching(
        &self,
        credentials: Option<Arc<dyn CredentialStore>>,
    ) -> Result<PassReport, CoreError> {
        if let Some(store) = credentials {
            self.start_rotation_listener(store).await;
        }
        self.run_pass().await.inspect_err(|e| {
            self.inner.log.error(&format!("Reconciliation aborted: {e}"));
        })
    }

    // ── Observation ──────────────────────────────────────────────

    /// Snapshot of the registry table.
    pub async fn cached_accessories(&self) -> Vec<PlatformAccessory> {
        self.inner.cache.lock().await.to_vec()
    }

    /// Completion time of the last applied pass.
    pub fn last_pass(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.inner.last_pass.subscribe()
    }

    pub async fn rotation_stats(&self) -> Option<watch::Receiver<RotationStats>> {
        self.inner
            .rotation
            .lock()
            .await
            .as_ref()
            .map(RotationListener::stats)
    }

    // ── Credential rotation ──────────────────────────────────────

    /// Subscribe to directory credential rotations. Replaces any listener
    /// already running.
    pub async fn start_rotation_listener(&self, store: Arc<dyn CredentialStore>) {
        let listener = RotationListener::spawn(
            self.inner.directory.refresh_token_rotations(),
            store,
            self.inner.cancel.child_token(),
        );
        let previous = self.inner.rotation.lock().await.replace(listener);
        if let Some(previous) = previous {
            previous.shutdown().await;
        }
    }

    /// Stop background tasks. Queued credential writes finish first.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let listener = self.inner.rotation.lock().await.take();
        if let Some(listener) = listener {
            listener.shutdown().await;
        }
        debug!("platform shut down");
    }

    // ── Reconciliation ───────────────────────────────────────────

    /// Compute a pass without calling the host or touching the cache.
    pub async fn plan_pass(&self) -> Result<PassReport, CoreError> {
        let started_at = Utc::now();
        let scans = self.scan_locations().await?;
        let cache = self.inner.cache.lock().await;
        Ok(self.build_report(started_at, scans, &cache))
    }

    /// Run one full pass and apply it.
    ///
    /// Directory failures abort before any host call. Host failures abort
    /// the remaining batches; batches already applied stay applied.
    pub async fn run_pass(&self) -> Result<PassReport, CoreError> {
        let started_at = Utc::now();
        let scans = self.scan_locations().await?;

        let mut cache = self.inner.cache.lock().await;
        let mut report = self.build_report(started_at, scans, &cache);
        self.announce_hidden(&report);
        self.apply(&report.plan, &mut cache).await?;

        report.applied = true;
        report.completed_at = Utc::now();
        self.inner.last_pass.send_replace(Some(report.completed_at));

        info!(
            created = report.plan.create.len(),
            reused = report.plan.reuse.len(),
            external = report.plan.external.len(),
            removed = report.plan.stale.len(),
            "reconciliation pass complete"
        );
        Ok(report)
    }

    async fn scan_locations(&self) -> Result<Vec<LocationScan>, CoreError> {
        let config = &self.inner.config;
        if config.refresh_token.is_none() {
            self.inner
                .log
                .error("No refresh token configured; skipping device discovery");
            return Err(CoreError::MissingCredential);
        }

        let locations: Vec<Arc<dyn Location>> = self
            .inner
            .directory
            .locations()
            .await?
            .into_iter()
            .filter(|location| config.admits_location(location.id()))
            .collect();

        if locations.is_empty() {
            self.inner.log.warn("No locations found for this account");
        }

        try_join_all(
            locations
                .iter()
                .map(|location| self.scan_location(location.as_ref())),
        )
        .await
    }

    async fn scan_location(&self, location: &dyn Location) -> Result<LocationScan, CoreError> {
        let mut devices = location.devices().await?;
        devices.extend(location.cameras());
        devices.extend(location.chimes());
        devices.extend(location.intercoms());

        let devices = injector::augment(devices, location, &self.inner.config).await;
        debug!(location = location.id(), devices = devices.len(), "scanned location");

        Ok(LocationScan::build(
            location.id(),
            location.name(),
            devices,
            &self.inner.resolver,
            &self.inner.config,
        ))
    }

    fn build_report(
        &self,
        started_at: DateTime<Utc>,
        scans: Vec<LocationScan>,
        cache: &AccessoryCache,
    ) -> PassReport {
        let locations = scans
            .iter()
            .map(|scan| LocationSummary {
                id: scan.location_id.clone(),
                name: scan.location_name.clone(),
                devices: scan.device_count(),
                visible: scan.visible.len(),
                hidden: scan.hidden.len(),
            })
            .collect();

        let mut hidden = Vec::new();
        let mut live = Vec::new();
        for scan in scans {
            hidden.extend(scan.hidden);
            live.extend(scan.visible);
        }

        let plan = reconcile(live, cache, &self.inner.config);

        PassReport {
            started_at,
            completed_at: Utc::now(),
            applied: false,
            locations,
            hidden,
            plan,
        }
    }

    fn announce_hidden(&self, report: &PassReport) {
        let log = &self.inner.log;

        for hidden in report.hidden.iter().filter(|h| !h.is_quiet()) {
            if hidden.reason == HiddenReason::Unsupported {
                debug!(
                    id = %hidden.id,
                    device_type = %hidden.device.device_type,
                    name = %hidden.device.name,
                    "unsupported device"
                );
                continue;
            }
            log.info(&format!(
                "Hidden accessory {} {} {} ({})",
                hidden.id, hidden.device.device_type, hidden.device.name, hidden.reason
            ));
        }

        for duplicate in &report.plan.duplicates {
            log.warn(&format!(
                "Skipping {} {}: identity {} already claimed this pass",
                duplicate.device.device_type, duplicate.device.name, duplicate.id
            ));
        }
    }

    async fn apply(&self, plan: &ReconcilePlan, cache: &mut AccessoryCache) -> Result<(), CoreError> {
        let host = &self.inner.host;
        let log = &self.inner.log;

        if !plan.deregister.is_empty() {
            for accessory in &plan.deregister {
                log.info(&format!(
                    "Unregistering bridged accessory {} to publish it externally",
                    accessory.display_name
                ));
            }
            host.unregister_platform_accessories(&plan.deregister)
                .await
                .inspect_err(|e| log.error(&format!("Failed to unregister accessories: {e}")))?;
            for accessory in &plan.deregister {
                cache.remove(&accessory.id);
            }
        }

        for mac in &plan.purge {
            if let Err(e) = host.purge_accessory_artifacts(mac).await {
                log.warn(&format!("Failed to clean up legacy files for {mac}: {e}"));
            }
        }

        if !plan.create.is_empty() {
            let accessories: Vec<PlatformAccessory> =
                plan.create.iter().map(|b| b.accessory.clone()).collect();
            for binding in &plan.create {
                log.info(&format!(
                    "Adding new accessory {} {}",
                    binding.variant, binding.device.name
                ));
            }
            host.register_platform_accessories(&accessories)
                .await
                .inspect_err(|e| log.error(&format!("Failed to register accessories: {e}")))?;
            for accessory in accessories {
                cache.insert(accessory);
            }
        }

        if !plan.external.is_empty() {
            let accessories: Vec<PlatformAccessory> =
                plan.external.iter().map(|b| b.accessory.clone()).collect();
            for binding in &plan.external {
                log.info(&format!(
                    "Publishing external accessory {} {}",
                    binding.variant, binding.device.name
                ));
            }
            host.publish_external_accessories(&accessories)
                .await
                .inspect_err(|e| log.error(&format!("Failed to publish accessories: {e}")))?;
        }

        if !plan.stale.is_empty() {
            for accessory in &plan.stale {
                log.info(&format!(
                    "Removing stale accessory {} {}",
                    accessory.id, accessory.display_name
                ));
            }
            host.unregister_platform_accessories(&plan.stale)
                .await
                .inspect_err(|e| log.error(&format!("Failed to remove stale accessories: {e}")))?;
            for accessory in &plan.stale {
                cache.remove(&accessory.id);
            }
        }

        Ok(())
    }
}
