use thiserror::Error;

/// Top-level error type for the `homelink-api` crate.
///
/// Covers every failure mode at the directory boundary: authentication,
/// connectivity, and malformed payloads. `homelink-core` maps these into
/// pass-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The directory rejected the refresh credential.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// No refresh credential was supplied.
    #[error("Refresh token missing")]
    MissingRefreshToken,

    // ── Transport ───────────────────────────────────────────────────
    /// The directory could not be reached.
    #[error("Directory unreachable: {reason}")]
    Connection { reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the offending source for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, source_name: String },

    /// Reading a snapshot from disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this is a connectivity failure.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Io(_))
    }
}
