//! Registration-plate lookup port.

use async_trait::async_trait;

use crate::domain::RegistrationResult;
use crate::error::LookupError;

/// Client for an external vehicle registration lookup provider.
///
/// One attempt per call; callers decide whether to retry.
#[async_trait]
pub trait RegistrationLookup: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Look up a trimmed, non-empty registration mark.
    ///
    /// # Errors
    ///
    /// [`LookupError::UpstreamUnavailable`] on transport failure,
    /// [`LookupError::UpstreamError`] on a non-200 status, and
    /// [`LookupError::InvalidUpstreamResponse`] when the body is not the
    /// expected JSON document.
    async fn lookup(&self, plate: &str) -> Result<RegistrationResult, LookupError>;
}
