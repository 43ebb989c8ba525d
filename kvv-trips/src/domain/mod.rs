//! Domain types for the trip search.
//!
//! Requests, the provider session, autocomplete locations, disambiguation
//! candidates, the trip model and time normalisation. Nothing in here performs I/O.

mod location;
mod request;
mod session;
mod suggestion;
mod time;
mod trip;

pub use location::{Location, LocationKind};
pub use request::{
    Accessibility, Action, ChangeSpeed, Language, PROVIDER_TIMEZONE, PreciseTripRequest,
    SEARCH_ENGINE_KEY, SEARCH_ENGINE_VALUE, TransportParams, TravelType, TripQuery, TripRequest,
};
pub use session::Session;
pub use suggestion::{SuggestionRole, TripSuggestion};
pub use time::{
    ROLLOVER_TOLERANCE_MINS, TimeError, instant, normalize, normalize_timestamp,
    parse_duration_hhmm, parse_hhmm, resolve_time_of_day,
};
pub use trip::{Section, Station, Trip};
