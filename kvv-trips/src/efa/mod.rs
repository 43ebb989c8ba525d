//! EFA (Elektronische Fahrplanauskunft) provider boundary.
//!
//! The KVV search endpoint speaks a form-post protocol designed for its own
//! web frontend:
//! - Trip searches answer with HTML views tagged by a marker comment
//! - A session/request id pair travels in hidden fields and must be echoed
//! - Ambiguous location names come back as a chooser of provider tokens
//! - Autocomplete answers with JSON on the same endpoint

mod client;
mod error;
mod extract;
mod mock;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use client::{EfaClient, EfaConfig};
pub use error::EfaError;
pub use extract::{
    CHOOSER_MARKER, ExtractError, PageKind, ResponseDocument, ResponsePage, TRIPS_MARKER,
    normalize_body,
};
pub use mock::MockTransport;
pub use transport::Transport;
pub use types::{StopFinder, StopFinderResponse, StopPoint};
