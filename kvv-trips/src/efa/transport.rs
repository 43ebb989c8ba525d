//! The submission capability the search controller depends on.

use std::future::Future;

use crate::domain::TransportParams;

use super::error::EfaError;

/// Submit named parameters to the provider and receive the response body.
///
/// Implementations own connection handling, timeouts and retries. A failure
/// of the exchange itself is reported as [`EfaError::Http`] or
/// [`EfaError::Api`]; the body is returned untouched otherwise.
pub trait Transport {
    fn submit(
        &self,
        params: &TransportParams,
    ) -> impl Future<Output = Result<String, EfaError>> + Send;
}
