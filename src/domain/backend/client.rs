//! Port to the backend data service

use async_trait::async_trait;
use bytes::Bytes;

use super::envelope::RequestEnvelope;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Sends one envelope to the backend and returns the raw success body.
///
/// Implementations must map a non-success status to
/// [`DomainError::Backend`] and connection failures to
/// [`DomainError::Transport`]. They never retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn send(&self, envelope: RequestEnvelope) -> Result<Bytes, DomainError>;
}
