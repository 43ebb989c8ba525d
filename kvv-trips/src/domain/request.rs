//! Trip search requests and their wire encoding.
//!
//! A [`TripRequest`] is what a caller builds. A [`PreciseTripRequest`]
//! additionally carries the location tokens the provider handed out in a
//! disambiguation page and can only be obtained from one. Both encode to the
//! flat parameter set the provider's search form expects.

use std::collections::BTreeMap;

use chrono::{Timelike, Utc};
use chrono_tz::Tz;

use super::session::Session;
use super::time::{TimeError, instant};

/// Flat string parameters submitted to the provider.
pub type TransportParams = BTreeMap<&'static str, String>;

/// Search engine selector expected by the provider.
pub const SEARCH_ENGINE_KEY: &str = "eID";
/// Value for [`SEARCH_ENGINE_KEY`].
pub const SEARCH_ENGINE_VALUE: &str = "ix_efa_searchService";

/// Zone the provider renders and reads wall-clock times in.
pub const PROVIDER_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Search operations understood by the provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StopSearch,
    TripSearch,
}

impl Action {
    /// Provider code for this action.
    pub fn code(self) -> &'static str {
        match self {
            Action::StopSearch => "stopRequest",
            Action::TripSearch => "tripRequest",
        }
    }
}

/// Whether the request timestamp is a departure or an arrival time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TravelType {
    #[default]
    Departure,
    Arrival,
}

impl TravelType {
    /// Provider code for this travel type.
    pub fn code(self) -> &'static str {
        match self {
            TravelType::Departure => "dep",
            TravelType::Arrival => "arr",
        }
    }
}

/// How quickly the traveller changes between vehicles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl ChangeSpeed {
    /// Provider code for this change speed.
    pub fn code(self) -> &'static str {
        match self {
            ChangeSpeed::Slow => "slow",
            ChangeSpeed::Normal => "normal",
            ChangeSpeed::Fast => "fast",
        }
    }
}

/// Response language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    German,
    #[default]
    English,
    French,
    Italian,
    Turkish,
}

impl Language {
    /// Provider code for this language. German is the provider default and
    /// has an empty code.
    pub fn code(self) -> &'static str {
        match self {
            Language::German => "",
            Language::English => "1",
            Language::French => "2",
            Language::Italian => "3",
            Language::Turkish => "4",
        }
    }
}

/// Accessibility constraints. Every combination is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accessibility {
    pub omit_stairs: bool,
    pub omit_elevators: bool,
    pub omit_escalators: bool,
    pub require_low_floor: bool,
    pub require_wheelchair: bool,
}

impl Accessibility {
    /// All constraints enabled.
    pub fn barrier_free() -> Self {
        Self {
            omit_stairs: true,
            omit_elevators: true,
            omit_escalators: true,
            require_low_floor: true,
            require_wheelchair: true,
        }
    }
}

/// A trip search between two free-text locations.
///
/// # Examples
///
/// ```
/// use kvv_trips::domain::{TravelType, TripRequest};
///
/// let request = TripRequest::new("Karlsruhe Hbf", "Durlach", 1_710_495_000)
///     .with_travel_type(TravelType::Arrival)
///     .barrier_free();
///
/// let params = request.to_transport_parameters().unwrap();
/// assert_eq!(params["ix_originText"], "Karlsruhe Hbf");
/// assert_eq!(params["ix_travelType"], "arr");
/// assert_eq!(params["ix_wheelchair"], "1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    origin: String,
    destination: String,
    timestamp: i64,
    travel_type: TravelType,
    language: Language,
    accessibility: Accessibility,
    change_speed: ChangeSpeed,
    session: Session,
    timezone: Tz,
}

impl TripRequest {
    /// Create a request for the given unix timestamp (seconds).
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, timestamp: i64) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            timestamp,
            travel_type: TravelType::default(),
            language: Language::default(),
            accessibility: Accessibility::default(),
            change_speed: ChangeSpeed::default(),
            session: Session::default(),
            timezone: PROVIDER_TIMEZONE,
        }
    }

    /// Create a request departing now.
    pub fn departing_now(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(origin, destination, Utc::now().timestamp())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Unix timestamp (seconds) the search is anchored at.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn travel_type(&self) -> TravelType {
        self.travel_type
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn change_speed(&self) -> ChangeSpeed {
        self.change_speed
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Zone the timestamp is rendered in for the provider.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_travel_type(mut self, travel_type: TravelType) -> Self {
        self.travel_type = travel_type;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Enable every accessibility constraint.
    pub fn barrier_free(self) -> Self {
        self.with_accessibility(Accessibility::barrier_free())
    }

    pub fn with_change_speed(mut self, change_speed: ChangeSpeed) -> Self {
        self.change_speed = change_speed;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Encode the request as provider form parameters.
    ///
    /// Fails only if the timestamp cannot be represented as a date.
    pub fn to_transport_parameters(&self) -> Result<TransportParams, TimeError> {
        let when = instant(self.timestamp, self.timezone)?;
        let flags = &self.accessibility;

        let mut params = TransportParams::new();
        params.insert("ix_originValue", self.origin.clone());
        params.insert("ix_originText", self.origin.clone());
        params.insert("type_origin", "any".to_string());

        params.insert("ix_destinationValue", self.destination.clone());
        params.insert("ix_destinationText", self.destination.clone());
        params.insert("type_destination", "any".to_string());

        params.insert("ix_date", when.format("%d.%m.%Y").to_string());
        params.insert("ix_hour", when.hour().to_string());
        params.insert("ix_minute", when.minute().to_string());

        params.insert("ix_travelType", self.travel_type.code().to_string());
        params.insert("ix_noSolidStairs", flag(flags.omit_stairs));
        params.insert("ix_noEscalators", flag(flags.omit_escalators));
        params.insert("ix_noElevators", flag(flags.omit_elevators));
        params.insert("ix_lowPlatformVhcl", flag(flags.require_low_floor));
        params.insert("ix_wheelchair", flag(flags.require_wheelchair));
        params.insert("ix_changeSpeed", self.change_speed.code().to_string());

        params.insert("ix_language", self.language.code().to_string());
        params.insert(SEARCH_ENGINE_KEY, SEARCH_ENGINE_VALUE.to_string());
        params.insert("ix_action", Action::TripSearch.code().to_string());
        params.insert("sessionID", self.session.session_id().to_string());
        params.insert("requestID", self.session.request_id().to_string());

        Ok(params)
    }
}

/// A trip request pinned to provider location tokens.
///
/// Only obtainable from a disambiguation page (see
/// [`Disambiguation::build_precise_request`](crate::search::Disambiguation::build_precise_request)),
/// because the tokens are issued by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PreciseTripRequest {
    request: TripRequest,
    origin_session_value: String,
    destination_session_value: String,
}

impl PreciseTripRequest {
    pub(crate) fn new(
        request: TripRequest,
        origin_session_value: impl Into<String>,
        destination_session_value: impl Into<String>,
    ) -> Self {
        Self {
            request,
            origin_session_value: origin_session_value.into(),
            destination_session_value: destination_session_value.into(),
        }
    }

    /// The underlying request, with origin and destination already rewritten
    /// to the chosen suggestions.
    pub fn request(&self) -> &TripRequest {
        &self.request
    }

    pub fn origin_session_value(&self) -> &str {
        &self.origin_session_value
    }

    pub fn destination_session_value(&self) -> &str {
        &self.destination_session_value
    }

    /// Adjust the underlying request while keeping the location tokens.
    pub fn map_request(mut self, f: impl FnOnce(TripRequest) -> TripRequest) -> Self {
        self.request = f(self.request);
        self
    }

    /// Encode as provider form parameters, including the location tokens.
    ///
    /// A token containing `:` refers to an entry of the provider's choice
    /// list and is flagged with a `nameState_*` marker.
    pub fn to_transport_parameters(&self) -> Result<TransportParams, TimeError> {
        let mut params = self.request.to_transport_parameters()?;
        params.insert("ix_originSessionValue", self.origin_session_value.clone());
        params.insert(
            "ix_destinationSessionValue",
            self.destination_session_value.clone(),
        );

        if self.origin_session_value.contains(':') {
            params.insert("nameState_origin", "list".to_string());
        }
        if self.destination_session_value.contains(':') {
            params.insert("nameState_destination", "list".to_string());
        }

        Ok(params)
    }
}

/// Either kind of request, as accepted by the search controller.
#[derive(Debug, Clone, PartialEq)]
pub enum TripQuery {
    Plain(TripRequest),
    Precise(PreciseTripRequest),
}

impl TripQuery {
    /// The plain request part.
    pub fn request(&self) -> &TripRequest {
        match self {
            TripQuery::Plain(request) => request,
            TripQuery::Precise(precise) => precise.request(),
        }
    }

    /// Adjust the plain request part, keeping any location tokens.
    pub fn map_request(self, f: impl FnOnce(TripRequest) -> TripRequest) -> Self {
        match self {
            TripQuery::Plain(request) => TripQuery::Plain(f(request)),
            TripQuery::Precise(precise) => TripQuery::Precise(precise.map_request(f)),
        }
    }

    pub fn to_transport_parameters(&self) -> Result<TransportParams, TimeError> {
        match self {
            TripQuery::Plain(request) => request.to_transport_parameters(),
            TripQuery::Precise(precise) => precise.to_transport_parameters(),
        }
    }
}

impl From<TripRequest> for TripQuery {
    fn from(request: TripRequest) -> Self {
        TripQuery::Plain(request)
    }
}

impl From<PreciseTripRequest> for TripQuery {
    fn from(precise: PreciseTripRequest) -> Self {
        TripQuery::Precise(precise)
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Datelike, NaiveDate, NaiveTime};
    use proptest::prelude::*;

    proptest! {
        /// Decoding ix_date/ix_hour/ix_minute recovers the calendar date and
        /// time of day of the timestamp
        #[test]
        fn date_and_time_roundtrip(ts in 0i64..4_102_444_800) {
            let request = TripRequest::new("a", "b", ts);
            let params = request.to_transport_parameters().unwrap();

            let date = NaiveDate::parse_from_str(&params["ix_date"], "%d.%m.%Y").unwrap();
            let hour: u32 = params["ix_hour"].parse().unwrap();
            let minute: u32 = params["ix_minute"].parse().unwrap();
            let decoded = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();

            let local = instant(ts, PROVIDER_TIMEZONE).unwrap();
            prop_assert_eq!(date, local.date_naive());
            prop_assert_eq!(date.day(), local.day());
            prop_assert_eq!(decoded, local.time().with_second(0).unwrap());
        }
    }
}
