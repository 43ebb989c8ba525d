//! Results of a trip search.

use crate::domain::{PreciseTripRequest, SuggestionRole, TripQuery, TripRequest, TripSuggestion};
use crate::efa::{EfaError, Transport};
use crate::similarity::similarity;

use super::collection::TripCollection;
use super::controller::TripSearch;

/// What a trip search produced.
///
/// Neither ambiguity nor absence is an error: both carry the query so the
/// caller can refine it.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The provider listed trips.
    Found(TripCollection),
    /// The provider needs origin and/or destination narrowed down.
    Ambiguous(Disambiguation),
    /// The provider found nothing for the query. Both suggestion lists are
    /// empty.
    NoTarget(Disambiguation),
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// The trips, if any were found.
    pub fn trips(self) -> Option<TripCollection> {
        match self {
            SearchOutcome::Found(collection) => Some(collection),
            _ => None,
        }
    }

    /// The disambiguation, for either the ambiguous or the no-target case.
    pub fn disambiguation(self) -> Option<Disambiguation> {
        match self {
            SearchOutcome::Found(_) => None,
            SearchOutcome::Ambiguous(d) | SearchOutcome::NoTarget(d) => Some(d),
        }
    }
}

/// Candidate locations offered for a query, and the query itself.
///
/// Precise requests can only be built from here, since their tokens are
/// issued by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Disambiguation {
    query: TripQuery,
    origins: Vec<TripSuggestion>,
    destinations: Vec<TripSuggestion>,
}

impl Disambiguation {
    pub(crate) fn new(
        query: TripQuery,
        origins: Vec<TripSuggestion>,
        destinations: Vec<TripSuggestion>,
    ) -> Self {
        Self {
            query,
            origins,
            destinations,
        }
    }

    /// A disambiguation with nothing to choose from.
    pub(crate) fn no_target(query: TripQuery) -> Self {
        Self::new(query, Vec::new(), Vec::new())
    }

    /// The query that led here.
    pub fn query(&self) -> &TripQuery {
        &self.query
    }

    pub fn request(&self) -> &TripRequest {
        self.query.request()
    }

    pub fn origin_suggestions(&self) -> &[TripSuggestion] {
        &self.origins
    }

    pub fn destination_suggestions(&self) -> &[TripSuggestion] {
        &self.destinations
    }

    pub fn suggestions(&self, role: SuggestionRole) -> &[TripSuggestion] {
        match role {
            SuggestionRole::Origin => &self.origins,
            SuggestionRole::Destination => &self.destinations,
        }
    }

    /// True unless both suggestion lists are empty.
    pub fn is_resolved(&self) -> bool {
        !(self.origins.is_empty() && self.destinations.is_empty())
    }

    /// Pin the query to the chosen suggestions without submitting it.
    ///
    /// Origin and destination are rewritten to the suggestions' raw labels;
    /// every other setting of the query is kept. The query itself is left
    /// untouched.
    pub fn build_precise_request(
        &self,
        origin: &TripSuggestion,
        destination: &TripSuggestion,
    ) -> PreciseTripRequest {
        let request = self
            .query
            .request()
            .clone()
            .with_origin(origin.raw_label())
            .with_destination(destination.raw_label());

        PreciseTripRequest::new(request, origin.token(), destination.token())
    }

    /// Pin the query to the suggestions most similar to what was asked for.
    ///
    /// Each candidate's raw label is scored against the requested text.
    /// The first candidate stands until another scores strictly higher, so
    /// ties and all-zero scores keep the provider's first choice.
    /// Returns `None` if either suggestion list is empty.
    pub fn best_match(&self) -> Option<PreciseTripRequest> {
        let request = self.query.request();
        let origin = most_probable(&self.origins, request.origin())?;
        let destination = most_probable(&self.destinations, request.destination())?;

        Some(self.build_precise_request(origin, destination))
    }

    /// Pin the query to the chosen suggestions and search again.
    ///
    /// The result may itself be ambiguous; there is no retry loop.
    pub async fn resolve_with<T: Transport>(
        &self,
        search: &mut TripSearch<T>,
        origin: &TripSuggestion,
        destination: &TripSuggestion,
    ) -> Result<SearchOutcome, EfaError> {
        search
            .get_trips(self.build_precise_request(origin, destination))
            .await
    }
}

fn most_probable<'a>(candidates: &'a [TripSuggestion], wanted: &str) -> Option<&'a TripSuggestion> {
    let mut best = candidates.first()?;
    let mut best_score = 0;

    for candidate in candidates {
        let score = similarity(candidate.raw_label(), wanted);
        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }

    Some(best)
}
