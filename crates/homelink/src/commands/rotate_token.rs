//! Rotate-token command handler.
//!
//! Feeds one rotation event through the same listener the platform runs,
//! so the file is rewritten exactly as a live rotation would rewrite it.

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use homelink_api::RefreshTokenRotation;
use homelink_config::ConfigFile;
use homelink_core::{CredentialStore, RotationListener, RotationStats};

use crate::cli::{GlobalOpts, RotateTokenArgs};
use crate::error::CliError;
use crate::output;

use super::config_path;

#[derive(Serialize)]
struct RotationOutcome {
    path: String,
    #[serde(flatten)]
    stats: RotationStats,
}

fn settled(stats: &RotationStats) -> bool {
    stats.persisted + stats.unmatched + stats.failed + stats.skipped + stats.lagged > 0
}

pub async fn handle(args: RotateTokenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.old.trim().is_empty() {
        return Err(CliError::Validation {
            field: "old".into(),
            reason: "the current token must not be empty".into(),
        });
    }
    if args.new.trim().is_empty() {
        return Err(CliError::Validation {
            field: "new".into(),
            reason: "the replacement token must not be empty".into(),
        });
    }

    let path = config_path(global);
    let store: Arc<dyn CredentialStore> = Arc::new(ConfigFile::new(&path));

    let (tx, rx) = broadcast::channel(1);
    let listener = RotationListener::spawn(rx, store, CancellationToken::new());
    let mut stats = listener.stats();

    tx.send(RefreshTokenRotation::new(
        Some(SecretString::from(args.old)),
        SecretString::from(args.new),
    ))
    .map_err(|e| CliError::Internal(format!("rotation listener not subscribed: {e}")))?;

    let waited = stats.wait_for(settled).await.map(|s| *s);
    listener.shutdown().await;
    let stats = waited.map_err(|e| CliError::Internal(format!("rotation listener stopped: {e}")))?;

    if stats.failed > 0 {
        return Err(CliError::Persist {
            message: format!("could not rewrite {}", path.display()),
        });
    }
    if stats.persisted == 0 {
        return Err(CliError::TokenNotFound {
            path: path.display().to_string(),
        });
    }

    let outcome = RotationOutcome {
        path: path.display().to_string(),
        stats,
    };
    let out = output::render_single(
        &global.output,
        &outcome,
        |o| format!("Refresh token updated in {}", o.path),
        |o| o.path.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
