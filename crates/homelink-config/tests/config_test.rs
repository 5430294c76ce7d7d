#![allow(clippy::unwrap_used)]
// Loading the platform section from host files and the environment, and
// rewriting rotated tokens on disk.

use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};

use homelink_config::{ConfigFile, PlatformSection, load_platform_config, load_section};
use homelink_core::CredentialStore;

const HOST_JSON: &str = r#"{
    "bridge": { "name": "Bridge" },
    "platforms": [
        { "platform": "Other", "refreshToken": "not-ours" },
        {
            "platform": "Homelink",
            "refreshToken": "rt-file",
            "hideLightGroups": true,
            "onlyDeviceTypes": ["sensor.contact"],
            "locationModePollingSeconds": 0
        }
    ]
}"#;

// ── Loading ─────────────────────────────────────────────────────────

#[test]
fn picks_homelink_entry_from_json() {
    Jail::expect_with(|jail| {
        jail.create_file("config.json", HOST_JSON)?;
        let section = load_section(Path::new("config.json")).map_err(|e| e.to_string())?;

        assert_eq!(section.refresh_token.as_deref(), Some("rt-file"));
        assert!(section.hide_light_groups);
        assert_eq!(section.only_device_types, vec!["sensor.contact".to_string()]);
        assert_eq!(section.location_mode_polling_seconds, 0);
        assert_eq!(section.camera_status_polling_seconds, 20);
        Ok(())
    });
}

#[test]
fn reads_toml_host_files() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [[platforms]]
                platform = "Homelink"
                refreshToken = "rt-toml"
                unbridgeCameras = true
            "#,
        )?;
        let config = load_platform_config(Path::new("config.toml")).map_err(|e| e.to_string())?;

        assert_eq!(config.refresh_token.unwrap().expose_secret(), "rt-toml");
        assert!(config.unbridge_cameras);
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.json", HOST_JSON)?;
        jail.set_env("HOMELINK_REFRESH_TOKEN", "rt-env");
        jail.set_env("HOMELINK_SHOW_PANIC_BUTTONS", "true");

        let section = load_section(Path::new("config.json")).map_err(|e| e.to_string())?;
        assert_eq!(section.refresh_token.as_deref(), Some("rt-env"));
        assert!(section.show_panic_buttons);
        assert!(section.hide_light_groups);
        Ok(())
    });
}

#[test]
fn environment_can_switch_off_a_file_flag() {
    Jail::expect_with(|jail| {
        jail.create_file("config.json", HOST_JSON)?;
        jail.set_env("HOMELINK_HIDE_LIGHT_GROUPS", "false");
        jail.set_env("HOMELINK_LOCATION_MODE_POLLING_SECONDS", "45");
        jail.set_env("HOMELINK_REFRESH_TOKEN", "rt-env");

        let config = load_platform_config(Path::new("config.json")).map_err(|e| e.to_string())?;
        assert!(!config.hide_light_groups);
        assert_eq!(config.location_mode_polling_seconds, 45);
        assert_eq!(config.refresh_token.unwrap().expose_secret(), "rt-env");
        assert_eq!(config.only_device_types, vec!["sensor.contact".to_string()]);
        Ok(())
    });
}

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let section = load_section(Path::new("absent.json")).map_err(|e| e.to_string())?;
        assert_eq!(section, PlatformSection::default());
        Ok(())
    });
}

// ── Token rewrite ───────────────────────────────────────────────────

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[tokio::test]
async fn config_file_rewrites_token_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, HOST_JSON).unwrap();

    let store = ConfigFile::new(&path);
    let replaced = store
        .replace_credential(&secret("rt-file"), &secret("rt-next"))
        .await
        .unwrap();
    assert!(replaced);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#""refreshToken": "rt-next""#));
    assert!(text.contains("not-ours"));
    assert!(text.contains(r#""bridge": { "name": "Bridge" }"#));
}

#[tokio::test]
async fn config_file_leaves_unmatched_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, HOST_JSON).unwrap();

    let store = ConfigFile::new(&path);
    let replaced = store
        .replace_credential(&secret("unknown"), &secret("rt-next"))
        .await
        .unwrap();
    assert!(!replaced);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), HOST_JSON);
}

#[tokio::test]
async fn config_file_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigFile::new(dir.path().join("gone.json"));
    let err = store
        .replace_credential(&secret("a"), &secret("b"))
        .await
        .unwrap_err();
    assert!(matches!(err, homelink_core::CoreError::CredentialPersist { .. }));
}
