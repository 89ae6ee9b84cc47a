//! Error types for the session layer.

/// Errors that can occur while resolving a participant's identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The token is unknown, revoked, or was rejected by the
    /// [`Authenticator`](crate::Authenticator).
    #[error("unauthorized")]
    Unauthorized,

    /// The authenticator itself could not answer (backend down, etc.).
    #[error("authentication failed: {0}")]
    AuthFailed(String),
}
