//! Host configuration for homelink.
//!
//! Reads the `Homelink` entry of the host's `platforms` array (JSON or
//! TOML), layers `HOMELINK_*` environment overrides on top, and translates
//! the result into `homelink_core::PlatformConfig`. [`ConfigFile`] rewrites
//! the stored refresh token when the directory rotates it.

mod rewrite;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use homelink_core::config::DEFAULT_POLLING_SECONDS;
use homelink_core::{AccessoryId, PlatformConfig};

pub use rewrite::{ConfigFile, replace_token};

/// The `platform` value that marks our section.
pub const PLATFORM_NAME: &str = "Homelink";

const ENV_PREFIX: &str = "HOMELINK_";

/// Section keys that may be overridden from the environment.
const ENV_KEYS: [&str; 10] = [
    "refresh_token",
    "hide_device_ids",
    "only_device_types",
    "hide_light_groups",
    "show_panic_buttons",
    "unbridge_cameras",
    "location_mode_polling_seconds",
    "camera_status_polling_seconds",
    "disable_logs",
    "location_ids",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Platform section ────────────────────────────────────────────────

/// The raw platform section, in the host's camelCase key names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct PlatformSection {
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Refresh token in plaintext. `HOMELINK_REFRESH_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub hide_device_ids: Vec<String>,

    #[serde(default)]
    pub only_device_types: Vec<String>,

    #[serde(default)]
    pub hide_light_groups: bool,

    #[serde(default)]
    pub show_panic_buttons: bool,

    #[serde(default)]
    pub unbridge_cameras: bool,

    #[serde(default = "default_polling")]
    pub location_mode_polling_seconds: u64,

    #[serde(default = "default_polling")]
    pub camera_status_polling_seconds: u64,

    #[serde(default)]
    pub disable_logs: bool,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub location_ids: Vec<String>,
}

impl Default for PlatformSection {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            refresh_token: None,
            hide_device_ids: Vec::new(),
            only_device_types: Vec::new(),
            hide_light_groups: false,
            show_panic_buttons: false,
            unbridge_cameras: false,
            location_mode_polling_seconds: DEFAULT_POLLING_SECONDS,
            camera_status_polling_seconds: DEFAULT_POLLING_SECONDS,
            disable_logs: false,
            debug: false,
            location_ids: Vec::new(),
        }
    }
}

fn default_platform() -> String {
    PLATFORM_NAME.into()
}
fn default_polling() -> u64 {
    DEFAULT_POLLING_SECONDS
}

/// Host file shape; only the platforms array matters here.
#[derive(Debug, Default, Deserialize)]
struct HostFile {
    #[serde(default)]
    platforms: Vec<serde_json::Map<String, serde_json::Value>>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the host configuration path via platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "homelink", "homelink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.json");
            p
        },
        |dirs| dirs.config_dir().join("config.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".homelink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn host_figment(path: &Path) -> Figment {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        Figment::new().merge(Toml::file(path))
    } else {
        Figment::new().merge(Json::file(path))
    }
}

/// `hide_light_groups` -> `hideLightGroups`.
fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// Load the platform section from `path` plus environment overrides.
///
/// A missing file or a file without a `Homelink` entry yields defaults,
/// so an environment-only setup still works.
pub fn load_section(path: &Path) -> Result<PlatformSection, ConfigError> {
    let host: HostFile = host_figment(path).extract()?;
    let section = host.platforms.into_iter().find(|entry| {
        entry
            .get("platform")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|name| name == PLATFORM_NAME)
    });

    let mut figment = Figment::new().merge(Serialized::defaults(PlatformSection::default()));
    if let Some(section) = section {
        figment = figment.merge(Serialized::defaults(section));
    }
    let figment = figment.merge(
        Env::prefixed(ENV_PREFIX)
            .only(&ENV_KEYS)
            .map(|key| snake_to_camel(key.as_str()).into())
            .lowercase(false),
    );

    Ok(figment.extract()?)
}

/// Load and translate in one step.
pub fn load_platform_config(path: &Path) -> Result<PlatformConfig, ConfigError> {
    section_to_platform_config(&load_section(path)?)
}

// ── Translation ─────────────────────────────────────────────────────

/// Refresh token from the merged section; empty values count as absent.
pub fn resolve_refresh_token(section: &PlatformSection) -> Option<SecretString> {
    section
        .refresh_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| SecretString::from(token.to_owned()))
}

/// Validate a section and build the runtime `PlatformConfig`.
pub fn section_to_platform_config(section: &PlatformSection) -> Result<PlatformConfig, ConfigError> {
    if let Some(bad) = section
        .hide_device_ids
        .iter()
        .find(|raw| raw.parse::<AccessoryId>().is_err())
    {
        return Err(ConfigError::Validation {
            field: "hideDeviceIds".into(),
            reason: format!("'{bad}' is not an accessory identity"),
        });
    }

    Ok(PlatformConfig {
        refresh_token: resolve_refresh_token(section),
        hide_device_ids: section.hide_device_ids.clone(),
        only_device_types: section.only_device_types.clone(),
        hide_light_groups: section.hide_light_groups,
        show_panic_buttons: section.show_panic_buttons,
        unbridge_cameras: section.unbridge_cameras,
        location_mode_polling_seconds: section.location_mode_polling_seconds,
        camera_status_polling_seconds: section.camera_status_polling_seconds,
        disable_logs: section.disable_logs,
        debug: section.debug,
        location_ids: section.location_ids.clone(),
    })
}
