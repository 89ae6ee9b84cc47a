//! Authentication hook for resolving a participant's identity.
//!
//! Rookery does not own accounts. Registration and login happen elsewhere
//! and hand the client an auth token; every command carries that token and
//! the server asks an [`Authenticator`] who it belongs to.
//!
//! [`MemoryAuthenticator`] is a token table for tests, demos, and
//! deployments where the lobby lives in the same process.

use std::collections::HashMap;

use rand::Rng;
use rookery_protocol::Username;
use tokio::sync::RwLock;

use crate::SessionError;

/// Resolves an auth token to the username it was issued for.
///
/// Called once per inbound command, so implementations should be cheap or
/// cache internally.
///
/// # Example
///
/// ```rust
/// use rookery_protocol::Username;
/// use rookery_session::{Authenticator, SessionError};
///
/// /// Treats the token itself as the username. Development only.
/// struct TrustingAuthenticator;
///
/// impl Authenticator for TrustingAuthenticator {
///     async fn authenticate(&self, token: &str) -> Result<Username, SessionError> {
///         if token.is_empty() {
///             return Err(SessionError::Unauthorized);
///         }
///         Ok(Username::from(token))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Returns the username bound to `token`.
    ///
    /// # Errors
    /// - [`SessionError::Unauthorized`] if the token is unknown
    /// - [`SessionError::AuthFailed`] if the lookup itself failed
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Username, SessionError>> + Send;
}

/// An in-memory token table.
#[derive(Debug, Default)]
pub struct MemoryAuthenticator {
    tokens: RwLock<HashMap<String, Username>>,
}

impl MemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh random token for `username`.
    ///
    /// A user may hold several tokens at once (one per login).
    pub async fn issue(&self, username: impl Into<Username>) -> String {
        let token = generate_token();
        let username = username.into();
        tracing::debug!(%username, "issued auth token");
        self.tokens.write().await.insert(token.clone(), username);
        token
    }

    /// Invalidates `token`. Returns `false` if it was not known.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

impl Authenticator for MemoryAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Username, SessionError> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionError::Unauthorized)
    }
}

/// 128 random bits as 32 lowercase hex characters.
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
