use secrecy::{ExposeSecret, SecretString};

/// Emitted whenever the directory rotates its long-lived refresh credential.
///
/// `old` is `None` (or empty) on the very first issuance, when there is
/// nothing persisted to replace.
#[derive(Debug, Clone)]
pub struct RefreshTokenRotation {
    pub old: Option<SecretString>,
    pub new: SecretString,
}

impl RefreshTokenRotation {
    pub fn new(old: Option<SecretString>, new: SecretString) -> Self {
        Self { old, new }
    }

    /// The previous credential, if one exists and is non-empty.
    pub fn previous(&self) -> Option<&SecretString> {
        self.old
            .as_ref()
            .filter(|old| !old.expose_secret().is_empty())
    }
}
