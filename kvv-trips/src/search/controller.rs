//! The session-holding search controller.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::LocationCache;
use crate::domain::{
    Action, Location, SEARCH_ENGINE_KEY, SEARCH_ENGINE_VALUE, Session, TransportParams, TripQuery,
};
use crate::efa::{EfaError, ResponseDocument, ResponsePage, StopFinderResponse, Transport};

use super::collection::TripCollection;
use super::config::SearchConfig;
use super::outcome::{Disambiguation, SearchOutcome};

/// One search conversation with the provider.
///
/// Holds the provider session and echoes it on every request. Each response
/// may hand out a new session, which replaces the current one before the
/// response is interpreted, whatever it turns out to be. Searching needs
/// `&mut self`: a conversation is strictly sequential, so use one
/// `TripSearch` per conversation.
///
/// # Examples
///
/// ```no_run
/// use kvv_trips::domain::TripRequest;
/// use kvv_trips::efa::{EfaClient, EfaConfig};
/// use kvv_trips::search::{SearchOutcome, TripSearch};
///
/// # async fn run() -> Result<(), kvv_trips::efa::EfaError> {
/// let client = EfaClient::new(EfaConfig::default())?;
/// let mut search = TripSearch::new(client);
///
/// let request = TripRequest::departing_now("Marktplatz", "Durlach");
/// if let SearchOutcome::Ambiguous(choices) = search.get_trips(request).await? {
///     if let Some(precise) = choices.best_match() {
///         let outcome = search.get_trips(precise).await?;
///         println!("found trips: {}", outcome.is_found());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct TripSearch<T> {
    transport: T,
    session: Session,
    locations: LocationCache,
}

impl<T: Transport> TripSearch<T> {
    /// Start a conversation with a fresh session.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SearchConfig::default())
    }

    pub fn with_config(transport: T, config: SearchConfig) -> Self {
        Self {
            transport,
            session: Session::default(),
            locations: LocationCache::new(&config.cache_config()),
        }
    }

    /// Resume a conversation with a known session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// The session the next request will carry.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search for trips.
    ///
    /// The current session is injected into the query before it is sent.
    /// Transport failures and unreadable trip or chooser views are errors;
    /// an ambiguous or fruitless search is an ordinary outcome.
    pub async fn get_trips(
        &mut self,
        query: impl Into<TripQuery>,
    ) -> Result<SearchOutcome, EfaError> {
        let session = self.session.clone();
        let query = query
            .into()
            .map_request(|request| request.with_session(session));
        let params = query.to_transport_parameters()?;

        debug!(
            travel_type = query.request().travel_type().code(),
            precise = matches!(query, TripQuery::Precise(_)),
            fresh_session = self.session.is_default(),
            "Submitting trip search"
        );

        let body = self.transport.submit(&params).await?;
        let page = self.read_response(&body, &query)?;

        let outcome = match page {
            ResponsePage::Trips(trips) => {
                debug!(trips = trips.len(), "Trip search found trips");
                SearchOutcome::Found(TripCollection::new(trips, query))
            }
            ResponsePage::Chooser {
                origins,
                destinations,
            } if !(origins.is_empty() && destinations.is_empty()) => {
                debug!(
                    origins = origins.len(),
                    destinations = destinations.len(),
                    "Trip search is ambiguous"
                );
                SearchOutcome::Ambiguous(Disambiguation::new(query, origins, destinations))
            }
            ResponsePage::Chooser { .. } | ResponsePage::NoTarget => {
                debug!("Trip search found no target");
                SearchOutcome::NoTarget(Disambiguation::no_target(query))
            }
        };

        Ok(outcome)
    }

    /// Parse a response, adopting any session it carries before extraction.
    fn read_response(&mut self, body: &str, query: &TripQuery) -> Result<ResponsePage, EfaError> {
        let document = ResponseDocument::parse(body);

        if let Some(session) = document.session() {
            trace!(
                session_id = session.session_id(),
                request_id = session.request_id(),
                "Session refreshed"
            );
            self.session = session;
        }

        let request = query.request();
        Ok(document.extract(request.timestamp(), request.timezone())?)
    }

    /// Locations whose names match `name`, in provider order.
    ///
    /// Results are cached per trimmed name. The session is neither sent
    /// nor changed.
    pub async fn autocomplete(&self, name: &str) -> Result<Arc<Vec<Location>>, EfaError> {
        if let Some(cached) = self.locations.get(name).await {
            trace!(query = name, "Autocomplete cache hit");
            return Ok(cached);
        }

        let mut params = TransportParams::new();
        params.insert("ix_action", Action::StopSearch.code().to_string());
        params.insert("name_sf", name.to_string());
        params.insert(SEARCH_ENGINE_KEY, SEARCH_ENGINE_VALUE.to_string());

        let body = self.transport.submit(&params).await?;

        let response: StopFinderResponse =
            serde_json::from_str(&body).map_err(|e| EfaError::Json {
                message: e.to_string(),
            })?;

        let locations = Arc::new(response.into_locations());
        debug!(query = name, matches = locations.len(), "Autocomplete answered");

        self.locations.insert(name, locations.clone()).await;
        Ok(locations)
    }
}
