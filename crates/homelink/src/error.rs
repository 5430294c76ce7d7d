//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use homelink_config::ConfigError;
use homelink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Directory ────────────────────────────────────────────────────
    #[error("Could not reach the device directory")]
    #[diagnostic(
        code(homelink::connection_failed),
        help("No accessories were changed. Check the directory and run again.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not load directory snapshot {path}")]
    #[diagnostic(
        code(homelink::snapshot),
        help("The snapshot must be a JSON document with a top-level \"locations\" array.")
    )]
    Snapshot {
        path: String,
        #[source]
        source: homelink_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(homelink::auth_failed),
        help("Generate a new refresh token and store it as refreshToken.")
    )]
    AuthFailed { message: String },

    #[error("No refresh token configured")]
    #[diagnostic(
        code(homelink::no_credentials),
        help(
            "Add refreshToken to the Homelink platform section of {path}\n\
             or set the HOMELINK_REFRESH_TOKEN environment variable."
        )
    )]
    NoCredentials { path: String },

    #[error("Token not found in {path}")]
    #[diagnostic(
        code(homelink::token_not_found),
        help("The file was left unchanged. Pass the token that is currently stored as --old.")
    )]
    TokenNotFound { path: String },

    // ── Host registry ────────────────────────────────────────────────
    #[error("Registry update failed during {operation}: {message}")]
    #[diagnostic(code(homelink::registry))]
    Registry { operation: String, message: String },

    #[error("Failed to persist rotated token: {message}")]
    #[diagnostic(code(homelink::persist))]
    Persist { message: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(homelink::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(homelink::config),
        help("Check the Homelink entry of the platforms array in your configuration file.")
    )]
    Config(Box<figment::Error>),

    #[error("Internal error: {0}")]
    #[diagnostic(code(homelink::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(homelink::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(homelink::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Snapshot { .. } | Self::TokenNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl CliError {
    /// Like `From<CoreError>`, with the config path for credential help.
    pub fn from_core(err: CoreError, config_path: &std::path::Path) -> Self {
        match err {
            CoreError::MissingCredential => Self::NoCredentials {
                path: config_path.display().to_string(),
            },
            other => other.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => Self::ConnectionFailed {
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::MissingCredential => Self::NoCredentials {
                path: homelink_config::config_path().display().to_string(),
            },
            CoreError::Host { operation, message } => Self::Registry { operation, message },
            CoreError::CredentialPersist { message } => Self::Persist { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_taxonomy() {
        let conn: CliError = CoreError::ConnectionFailed {
            reason: "down".into(),
        }
        .into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let auth: CliError = CoreError::MissingCredential.into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let host: CliError = CoreError::host("register", "disk full").into();
        assert_eq!(host.exit_code(), exit_code::GENERAL);
    }
}
