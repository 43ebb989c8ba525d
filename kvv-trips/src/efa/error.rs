//! Provider client error types.

use crate::domain::TimeError;

use super::extract::ExtractError;

/// Errors from talking to the provider or reading its responses.
///
/// "Ambiguous target" and "no target found" are not errors; they are
/// outcomes of a search (see [`SearchOutcome`](crate::search::SearchOutcome)).
#[derive(Debug, thiserror::Error)]
pub enum EfaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Markup carried a known page marker but not the expected structure
    #[error("unexpected page structure: {0}")]
    Parse(#[from] ExtractError),

    /// Autocomplete payload could not be decoded
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A timestamp could not be encoded or a trip time normalised
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Pagination needs at least one trip to anchor on
    #[error("cannot page from an empty trip collection")]
    EmptyCollection,
}

impl EfaError {
    /// True for failures of the transport itself, as opposed to problems
    /// with what the provider sent.
    pub fn is_transport(&self) -> bool {
        matches!(self, EfaError::Http(_) | EfaError::Api { .. })
    }
}
