//! Trips as reported by the provider's trip list.
//!
//! Times inside sections and stations stay exactly as the provider rendered
//! them. Only the trip interval is turned into absolute timestamps, and only
//! when asked, because doing so depends on the instant the search was
//! anchored at.

use chrono::Duration;
use chrono_tz::Tz;

use super::time::{TimeError, normalize_timestamp, parse_duration_hhmm};

/// An intermediate stop within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    /// Provider-formatted time, usually "HH:MM".
    pub time: String,
}

impl Station {
    pub fn new(name: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
        }
    }
}

/// One leg of a trip: a ride on a single route, or a footpath.
///
/// The provider does not say which; rides usually carry info lines naming
/// the route and direction.
#[derive(Debug, Clone)]
pub struct Section {
    pub info_lines: Vec<String>,
    pub origin_time: String,
    pub origin_place: String,
    pub destination_time: String,
    pub destination_place: String,
    pub stations: Vec<Station>,
}

/// Sections compare by their endpoints and stops. Info lines carry
/// realtime notes that change between responses for the same leg.
impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.origin_time == other.origin_time
            && self.origin_place == other.origin_place
            && self.destination_time == other.destination_time
            && self.destination_place == other.destination_place
            && self.stations == other.stations
    }
}

impl Eq for Section {}

/// A complete trip offered by the provider.
#[derive(Debug, Clone)]
pub struct Trip {
    /// Provider label of the trip row.
    pub label: String,
    /// Departure and arrival as "HH:MM".
    pub interval_raw: (String, String),
    /// Travel time as "HH:MM".
    pub duration_raw: String,
    /// Route names used, in order.
    pub routes_used: Vec<String>,
    pub change_count: u32,
    /// Never empty for trips taken from a trip list.
    pub sections: Vec<Section>,
    /// Timestamp of the request that produced this trip.
    pub request_timestamp: i64,
    /// Zone the request timestamp was rendered in.
    pub timezone: Tz,
}

impl Trip {
    /// Departure and arrival as unix timestamps.
    ///
    /// Each end is resolved against the request timestamp independently, with
    /// next-day inference as described in
    /// [`resolve_time_of_day`](super::resolve_time_of_day).
    pub fn interval(&self) -> Result<(i64, i64), TimeError> {
        Ok((self.departure()?, self.arrival()?))
    }

    /// Departure as a unix timestamp.
    pub fn departure(&self) -> Result<i64, TimeError> {
        normalize_timestamp(&self.interval_raw.0, self.request_timestamp, self.timezone)
    }

    /// Arrival as a unix timestamp.
    pub fn arrival(&self) -> Result<i64, TimeError> {
        normalize_timestamp(&self.interval_raw.1, self.request_timestamp, self.timezone)
    }

    /// Travel time.
    pub fn duration(&self) -> Result<Duration, TimeError> {
        parse_duration_hhmm(&self.duration_raw)
    }

    pub fn first_section(&self) -> Option<&Section> {
        self.sections.first()
    }

    pub fn last_section(&self) -> Option<&Section> {
        self.sections.last()
    }
}

/// Trips are equal when they describe the same journey: interval, changes,
/// duration, routes and sections. Label and request context are ignored.
impl PartialEq for Trip {
    fn eq(&self, other: &Self) -> bool {
        self.interval_raw == other.interval_raw
            && self.change_count == other.change_count
            && self.duration_raw == other.duration_raw
            && self.routes_used == other.routes_used
            && self.sections == other.sections
    }
}

impl Eq for Trip {}
