// ── Core error types ──
//
// Pass-level errors from homelink-core. Consumers never see directory
// payload failures directly; the `From<homelink_api::Error>` impl folds
// boundary errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Directory errors ─────────────────────────────────────────────
    #[error("Cannot reach the device directory: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("No refresh token configured; accessories were left untouched")]
    MissingCredential,

    // ── Host errors ──────────────────────────────────────────────────
    #[error("Host rejected {operation}: {message}")]
    Host { operation: String, message: String },

    // ── Credential persistence ───────────────────────────────────────
    #[error("Failed to persist rotated refresh token: {message}")]
    CredentialPersist { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn host(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Host {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Errors that abort a pass before any accessory was touched.
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::AuthenticationFailed { .. }
                | Self::MissingCredential
        )
    }
}

// ── Conversion from boundary errors ─────────────────────────────────

impl From<homelink_api::Error> for CoreError {
    fn from(err: homelink_api::Error) -> Self {
        use homelink_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthenticationFailed { message },
            Api::MissingRefreshToken => Self::MissingCredential,
            Api::Connection { reason } => Self::ConnectionFailed { reason },
            Api::Io(e) => Self::ConnectionFailed {
                reason: e.to_string(),
            },
            Api::Deserialization {
                message,
                source_name,
            } => Self::Internal(format!("malformed directory payload from {source_name}: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_map_to_connection_failed() {
        let err: CoreError = homelink_api::Error::Connection {
            reason: "timeout".into(),
        }
        .into();
        assert!(matches!(err, CoreError::ConnectionFailed { .. }));
        assert!(err.is_pre_mutation());
    }

    #[test]
    fn missing_token_maps_to_missing_credential() {
        let err: CoreError = homelink_api::Error::MissingRefreshToken.into();
        assert!(matches!(err, CoreError::MissingCredential));
    }

    #[test]
    fn host_errors_are_not_pre_mutation() {
        assert!(!CoreError::host("register", "boom").is_pre_mutation());
    }
}
