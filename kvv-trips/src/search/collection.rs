//! Trip lists and paging through them.

use tracing::debug;

use crate::domain::{TravelType, Trip, TripQuery};
use crate::efa::{EfaError, Transport};

use super::controller::TripSearch;
use super::outcome::SearchOutcome;

/// Trips returned for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct TripCollection {
    trips: Vec<Trip>,
    query: TripQuery,
}

impl TripCollection {
    pub(crate) fn new(trips: Vec<Trip>, query: TripQuery) -> Self {
        Self { trips, query }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn into_trips(self) -> Vec<Trip> {
        self.trips
    }

    /// The query these trips answer.
    pub fn query(&self) -> &TripQuery {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }

    /// Where the first trip starts.
    pub fn origin_name(&self) -> Option<&str> {
        self.trips
            .first()
            .and_then(Trip::first_section)
            .map(|section| section.origin_place.as_str())
    }

    /// Where the first trip ends.
    pub fn destination_name(&self) -> Option<&str> {
        self.trips
            .first()
            .and_then(Trip::last_section)
            .map(|section| section.destination_place.as_str())
    }

    /// Search again from the arrival of the last trip.
    ///
    /// Trips already in this collection are dropped from the result. The
    /// search can come back ambiguous like any other.
    pub async fn next_page<T: Transport>(
        &self,
        search: &mut TripSearch<T>,
    ) -> Result<SearchOutcome, EfaError> {
        let last = self.trips.last().ok_or(EfaError::EmptyCollection)?;
        let anchor = last.arrival()?;

        let query = self
            .query
            .clone()
            .map_request(|request| request.with_timestamp(anchor));

        let outcome = search.get_trips(query).await?;
        Ok(self.without_known(outcome))
    }

    /// Search for trips arriving by the departure of the first trip.
    ///
    /// Trips already in this collection are dropped from the result.
    pub async fn previous_page<T: Transport>(
        &self,
        search: &mut TripSearch<T>,
    ) -> Result<SearchOutcome, EfaError> {
        let first = self.trips.first().ok_or(EfaError::EmptyCollection)?;
        let anchor = first.departure()?;

        let query = self.query.clone().map_request(|request| {
            request
                .with_timestamp(anchor)
                .with_travel_type(TravelType::Arrival)
        });

        let outcome = search.get_trips(query).await?;
        Ok(self.without_known(outcome))
    }

    fn without_known(&self, outcome: SearchOutcome) -> SearchOutcome {
        match outcome {
            SearchOutcome::Found(mut page) => {
                let before = page.trips.len();
                page.trips.retain(|trip| !self.trips.contains(trip));

                debug!(
                    received = before,
                    dropped = before - page.trips.len(),
                    "Removed trips already listed"
                );

                SearchOutcome::Found(page)
            }
            other => other,
        }
    }
}

impl<'a> IntoIterator for &'a TripCollection {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
