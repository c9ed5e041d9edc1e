/// Errors from a [`TokenStore`](crate::TokenStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Token store lock poisoned")]
    Poisoned,
}

/// Errors from the QuestForge API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `detail` message, or the raw body if it had none.
        detail: String,
    },

    /// An authenticated call was made with no stored token.
    #[error("Not authenticated: log in first")]
    NotAuthenticated,

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl ClientError {
    /// HTTP status of an [`ClientError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
