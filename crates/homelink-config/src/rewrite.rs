// ── Refresh token rewrite ──
//
// The rotated credential is written back by textual substitution, so the
// rest of the host file (ordering, formatting, other platforms) survives
// untouched. Writes go through a sibling temp file and a rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use homelink_core::{CoreError, CredentialStore};

/// Replace every occurrence of `old` in `text`. `None` when `old` is
/// empty or absent.
pub fn replace_token(text: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() || !text.contains(old) {
        return None;
    }
    Some(text.replace(old, new))
}

/// The host configuration file as a [`CredentialStore`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "config".into(), |n| n.to_string_lossy().into_owned());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

fn persist_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::CredentialPersist {
        message: format!("{}: {err}", path.display()),
    }
}

#[async_trait]
impl CredentialStore for ConfigFile {
    async fn replace_credential(
        &self,
        old: &SecretString,
        new: &SecretString,
    ) -> Result<bool, CoreError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| persist_error(&self.path, &e))?;

        let Some(updated) = replace_token(&text, old.expose_secret(), new.expose_secret()) else {
            return Ok(false);
        };

        let temp = self.temp_path();
        tokio::fs::write(&temp, updated)
            .await
            .map_err(|e| persist_error(&temp, &e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| persist_error(&self.path, &e))?;
        Ok(true)
    }
}
