#![allow(clippy::unwrap_used, dead_code)]
// Shared fixtures for homelink-core integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use homelink_api::SnapshotDirectory;
use homelink_core::{
    AccessoryHost, AccessoryId, CoreError, MacAddress, Platform, PlatformAccessory, PlatformConfig,
    PlatformLog,
};

// ── Recording host ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Register(Vec<AccessoryId>),
    Unregister(Vec<AccessoryId>),
    Publish(Vec<AccessoryId>),
    Purge(MacAddress),
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    pub fail_register: bool,
}

impl RecordingHost {
    pub fn failing_register() -> Self {
        Self {
            fail_register: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn ids(accessories: &[PlatformAccessory]) -> Vec<AccessoryId> {
    accessories.iter().map(|a| a.id).collect()
}

#[async_trait]
impl AccessoryHost for RecordingHost {
    async fn register_platform_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        if self.fail_register {
            return Err(CoreError::host("register", "registry is read-only"));
        }
        self.record(HostCall::Register(ids(accessories)));
        Ok(())
    }

    async fn unregister_platform_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        self.record(HostCall::Unregister(ids(accessories)));
        Ok(())
    }

    async fn publish_external_accessories(
        &self,
        accessories: &[PlatformAccessory],
    ) -> Result<(), CoreError> {
        self.record(HostCall::Publish(ids(accessories)));
        Ok(())
    }

    async fn purge_accessory_artifacts(&self, mac: &MacAddress) -> Result<(), CoreError> {
        self.record(HostCall::Purge(mac.clone()));
        Ok(())
    }
}

// ── Recording log ───────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    pub fn lines(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl PlatformLog for RecordingLog {
    fn info(&self, message: &str) {
        self.lines.lock().unwrap().push(("info", message.to_owned()));
    }

    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(("warn", message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.lines.lock().unwrap().push(("error", message.to_owned()));
    }
}

// ── Builders ────────────────────────────────────────────────────────

pub fn token(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

/// Default config with a refresh token, so passes reach the directory.
pub fn config() -> PlatformConfig {
    PlatformConfig {
        refresh_token: Some(token("rt-1")),
        ..PlatformConfig::default()
    }
}

pub struct Harness {
    pub platform: Platform,
    pub host: Arc<RecordingHost>,
    pub log: Arc<RecordingLog>,
    pub directory: Arc<SnapshotDirectory>,
}

pub fn harness(doc: &str, config: PlatformConfig) -> Harness {
    harness_with_host(doc, config, RecordingHost::default())
}

pub fn harness_with_host(doc: &str, config: PlatformConfig, host: RecordingHost) -> Harness {
    let directory = Arc::new(SnapshotDirectory::from_json(doc).unwrap().with_refresh_token(token("rt-1")));
    let host = Arc::new(host);
    let log = Arc::new(RecordingLog::default());
    let platform = Platform::with_log(config, directory.clone(), host.clone(), log.clone());
    Harness {
        platform,
        host,
        log,
        directory,
    }
}

pub const HOME: &str = r#"{
    "locations": [
        {
            "id": "loc-1",
            "name": "Home",
            "devices": [
                { "id": "panel-1", "name": "Panel", "deviceType": "security-panel" },
                { "id": "door-1", "name": "Front Door", "deviceType": "sensor.contact" },
                { "id": "motion-1", "name": "Hall Motion", "deviceType": "sensor.motion" },
                { "id": "fan-1", "name": "Ceiling Fan", "deviceType": "switch.multilevel", "categoryId": 17 },
                { "id": "zw-1", "name": "Z-Wave Adapter", "deviceType": "adapter.zwave" }
            ],
            "cameras": [
                { "id": "cam-1", "name": "Porch", "deviceType": "doorbell_v4" }
            ]
        },
        {
            "id": "loc-2",
            "name": "Cabin",
            "devices": [
                { "id": "lock-1", "name": "Cabin Lock", "deviceType": "lock" }
            ]
        }
    ]
}"#;
