//! Authentication error types

use gatekeeper_client::ApiError;
use gatekeeper_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unauthorized: Admin access required.")]
    Unauthorized { role: String },
}

impl AuthError {
    /// Whether this error came from the role check rather than the network
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Unauthorized { .. })
    }
}
