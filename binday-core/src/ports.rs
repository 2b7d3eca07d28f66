//! Trait describing the provider capability and its error type.

use async_trait::async_trait;

use crate::model::{CouncilMeta, LookupRequest, LookupResponse};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while looking up a schedule from a council backend.
pub enum PortError {
    /// Postcode was not recognised or resolved to no addresses.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Selecting or confirming the address failed.
    #[error("{0}")]
    AddressProcessing(String),
    /// Session setup, navigation, or the postcode search failed.
    #[error("{0}")]
    Scrape(String),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortError {
    /// HTTP status class the error corresponds to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            PortError::NotFound(_) => 404,
            PortError::AddressProcessing(_) | PortError::Scrape(_) | PortError::Internal(_) => 500,
        }
    }
}

#[async_trait]
/// Trait for council-specific schedule lookup backends.
pub trait CollectionPort: Send + Sync {
    /// Metadata describing the council handled by this port.
    fn council(&self) -> &CouncilMeta;

    /// Look up the collection schedule for a postcode.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the postcode is unknown or the backend fails.
    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResponse, PortError>;
}
