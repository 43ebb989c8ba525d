//! Trip search conversations.
//!
//! A [`TripSearch`] owns the provider session and turns each response into
//! a [`SearchOutcome`]: trips, a choice between candidate locations, or
//! nothing at all. Choices are settled by building a precise request from a
//! [`Disambiguation`] and searching again; trip lists page forwards and
//! backwards from their own first and last trips.

mod collection;
mod config;
mod controller;
mod outcome;

#[cfg(test)]
mod search_tests;

pub use collection::TripCollection;
pub use config::SearchConfig;
pub use controller::TripSearch;
pub use outcome::{Disambiguation, SearchOutcome};
