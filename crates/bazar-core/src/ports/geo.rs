//! Postal-code lookup port (CEP → locality).

use async_trait::async_trait;

use crate::domain::Location;

/// Third-party postal-code resolution. `Ok(None)` means the code is
/// well-formed but unknown; malformed codes are an error.
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<Option<Location>, LookupError>;
}

/// Lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Malformed postal code: {0}")]
    Malformed(String),

    #[error("Lookup service failed: {0}")]
    Upstream(String),

    #[error("Lookup timed out")]
    Timeout,
}
