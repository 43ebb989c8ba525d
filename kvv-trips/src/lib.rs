//! Trip search client for the KVV (Karlsruher Verkehrsverbund) EFA service.
//!
//! The provider has no machine API for trip search, only the form protocol
//! behind its web frontend. This crate drives that protocol: it keeps the
//! session the provider expects to be echoed, reads trips out of the HTML
//! views, resolves ambiguous location names, and turns the bare times of day
//! the provider prints into timestamps.

pub mod cache;
pub mod domain;
pub mod efa;
pub mod search;
pub mod similarity;
