//! Command dispatch plus the config and directory loading shared by handlers.

pub mod devices;
pub mod identity;
pub mod reconcile;
pub mod rotate_token;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use homelink_api::SnapshotDirectory;
use homelink_core::PlatformConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Reconcile(args) => reconcile::handle(args, global).await,
        Command::Devices(args) => devices::handle(args, global).await,
        Command::Identity(args) => identity::handle(&args, global),
        Command::RotateToken(args) => rotate_token::handle(args, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}

// ── Shared loading ───────────────────────────────────────────────────

/// The host configuration path: `--config`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(homelink_config::config_path)
}

/// `HOMELINK_DEBUG` forces test-mode identities regardless of the file.
fn debug_forced() -> bool {
    std::env::var("HOMELINK_DEBUG")
        .is_ok_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

/// Load the platform configuration for this invocation.
pub fn load_config(global: &GlobalOpts) -> Result<(PathBuf, PlatformConfig), CliError> {
    let path = config_path(global);
    let mut config = homelink_config::load_platform_config(&path)?;
    if debug_forced() {
        config.debug = true;
    }
    debug!(
        path = %path.display(),
        debug = config.debug,
        locations = config.location_ids.len(),
        "loaded platform configuration"
    );
    Ok((path, config))
}

/// Load a directory snapshot seeded with the configured refresh token.
pub async fn open_directory(
    path: &Path,
    config: &PlatformConfig,
) -> Result<Arc<SnapshotDirectory>, CliError> {
    let directory = SnapshotDirectory::from_path(path)
        .await
        .map_err(|source| CliError::Snapshot {
            path: path.display().to_string(),
            source,
        })?;
    let directory = match &config.refresh_token {
        Some(token) => directory.with_refresh_token(token.clone()),
        None => directory,
    };
    Ok(Arc::new(directory))
}
