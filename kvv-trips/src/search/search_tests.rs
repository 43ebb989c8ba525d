//! Unit tests for the search controller against canned provider responses.

use super::*;
use crate::domain::{Session, TravelType, TripRequest};
use crate::efa::fixtures::{
    TripFixture, chooser_page, malformed_trips_page, stop_finder_json, trips_page,
    trips_page_without_session,
};
use crate::efa::{EfaError, ExtractError, MockTransport};
use chrono::TimeZone;
use chrono_tz::Tz;

fn ts(h: u32, mi: u32) -> i64 {
    Tz::UTC
        .with_ymd_and_hms(2024, 3, 15, h, mi, 0)
        .unwrap()
        .timestamp()
}

fn request() -> TripRequest {
    TripRequest::new("Marktplatz", "Durlach", ts(9, 55)).with_timezone(Tz::UTC)
}

fn later_trip() -> TripFixture {
    TripFixture {
        departure: "10:15",
        arrival: "10:40",
        duration: "00:25",
        ..TripFixture::default()
    }
}

fn latest_trip() -> TripFixture {
    TripFixture {
        departure: "10:45",
        arrival: "11:05",
        ..TripFixture::default()
    }
}

fn kvv_session() -> Session {
    Session::new("KVV_SESSION", "2")
}

#[tokio::test]
async fn trips_found() {
    let transport = MockTransport::new().with_body(trips_page(&[TripFixture::default(), later_trip()]));
    let mut search = TripSearch::new(transport);

    let outcome = search.get_trips(request()).await.unwrap();

    let collection = outcome.trips().expect("expected trips");
    assert_eq!(collection.len(), 2);
    assert!(collection.iter().all(|trip| !trip.sections.is_empty()));
    assert_eq!(collection.origin_name(), Some("Karlsruhe, Marktplatz"));
    assert_eq!(collection.destination_name(), Some("Durlach, Bahnhof"));

    let first = &collection.trips()[0];
    assert_eq!(first.interval().unwrap(), (ts(10, 0), ts(10, 20)));
    assert_eq!(first.duration().unwrap().num_seconds(), 20 * 60);

    assert_eq!(search.session(), &kvv_session());
}

#[tokio::test]
async fn request_carries_current_session() {
    let transport = MockTransport::new()
        .with_body(trips_page(&[TripFixture::default()]))
        .with_body(trips_page(&[TripFixture::default()]));
    let mut search = TripSearch::new(transport);

    search.get_trips(request()).await.unwrap();
    search.get_trips(request()).await.unwrap();

    let submitted = search.transport().submitted().await;
    assert_eq!(submitted.len(), 2);

    assert_eq!(submitted[0]["sessionID"], "");
    assert_eq!(submitted[0]["requestID"], "");
    assert_eq!(submitted[1]["sessionID"], "KVV_SESSION");
    assert_eq!(submitted[1]["requestID"], "2");

    assert_eq!(submitted[0]["ix_originText"], "Marktplatz");
    assert_eq!(submitted[0]["ix_action"], "tripRequest");
    assert_eq!(submitted[0]["eID"], "ix_efa_searchService");
    assert_eq!(submitted[0]["ix_date"], "15.03.2024");
    assert_eq!(submitted[0]["ix_hour"], "9");
    assert_eq!(submitted[0]["ix_minute"], "55");
}

#[tokio::test]
async fn seeded_session_is_sent() {
    let transport = MockTransport::new().with_body(trips_page_without_session(&[TripFixture::default()]));
    let mut search = TripSearch::new(transport).with_session(Session::new("RESUMED", "9"));

    search.get_trips(request()).await.unwrap();

    let submitted = search.transport().submitted().await;
    assert_eq!(submitted[0]["sessionID"], "RESUMED");
    assert_eq!(submitted[0]["requestID"], "9");

    // No session fields in the response: the seeded session stays
    assert_eq!(search.session(), &Session::new("RESUMED", "9"));
}

#[tokio::test]
async fn ambiguous_target() {
    let body = chooser_page(
        &[
            ("0:1", "Karlsruhe, Marktplatz [Haltestelle]"),
            ("0:2", "Karlsruhe, Marktplatz (Pyramide U) [Haltestelle]"),
        ],
        &[
            ("0:7", "Durlach, Bahnhof [Haltestelle]"),
            ("1:1", "Durlach [Ort]"),
            ("2:4", "Durlacher Tor [Haltestelle]"),
        ],
    );
    let mut search = TripSearch::new(MockTransport::new().with_body(body));

    let outcome = search.get_trips(request()).await.unwrap();

    let SearchOutcome::Ambiguous(choices) = outcome else {
        panic!("expected disambiguation");
    };
    assert!(choices.is_resolved());
    assert_eq!(choices.origin_suggestions().len(), 2);
    assert_eq!(choices.destination_suggestions().len(), 3);
    assert!(
        choices
            .destination_suggestions()
            .iter()
            .all(|s| !s.display_name().contains('[') && s.raw_label().contains('['))
    );

    // Session is refreshed on the disambiguation path too
    assert_eq!(search.session(), &kvv_session());
}

#[tokio::test]
async fn empty_chooser_is_no_target() {
    let mut search = TripSearch::new(MockTransport::new().with_body(chooser_page(&[], &[])));

    let outcome = search.get_trips(request()).await.unwrap();

    assert!(matches!(&outcome, SearchOutcome::NoTarget(d) if !d.is_resolved()));
    assert_eq!(search.session(), &kvv_session());
}

#[tokio::test]
async fn empty_trip_list_is_no_target() {
    let mut search = TripSearch::new(MockTransport::new().with_body(trips_page(&[])));

    let outcome = search.get_trips(request()).await.unwrap();

    let SearchOutcome::NoTarget(nothing) = outcome else {
        panic!("expected no target");
    };
    assert!(!nothing.is_resolved());
    assert!(nothing.origin_suggestions().is_empty());
    assert!(nothing.destination_suggestions().is_empty());
    assert!(nothing.best_match().is_none());
    assert_eq!(search.session(), &kvv_session());
}

#[tokio::test]
async fn unrecognised_page_is_no_target() {
    let body = "<html><body><h1>Fahrplanauskunft</h1></body></html>";
    let mut search = TripSearch::new(MockTransport::new().with_body(body));

    let outcome = search.get_trips(request()).await.unwrap();

    assert!(matches!(outcome, SearchOutcome::NoTarget(_)));
    assert!(search.session().is_default());
}

#[tokio::test]
async fn malformed_trip_list_is_a_parse_error() {
    let mut search = TripSearch::new(MockTransport::new().with_body(malformed_trips_page()));

    let err = search.get_trips(request()).await.unwrap_err();

    assert!(matches!(
        err,
        EfaError::Parse(ExtractError::MissingElement("li.fahrtenlistende"))
    ));
    assert!(!err.is_transport());

    // The session is still adopted
    assert_eq!(search.session(), &kvv_session());
}

#[tokio::test]
async fn transport_failure_is_not_no_target() {
    let transport = MockTransport::new().with_failure(502, "Bad Gateway");
    let mut search = TripSearch::new(transport).with_session(Session::new("S", "1"));

    let err = search.get_trips(request()).await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, EfaError::Api { status: 502, .. }));
    assert_eq!(search.session(), &Session::new("S", "1"));
}

#[tokio::test]
async fn resolve_with_submits_precise_request() {
    let chooser = chooser_page(
        &[("0:1", "Karlsruhe, Marktplatz [Haltestelle]")],
        &[("1234", "Durlach, Bahnhof [Haltestelle]")],
    );
    let transport = MockTransport::new()
        .with_body(chooser)
        .with_body(trips_page(&[TripFixture::default()]));
    let mut search = TripSearch::new(transport);

    let choices = search
        .get_trips(request().with_travel_type(TravelType::Arrival))
        .await
        .unwrap()
        .disambiguation()
        .expect("expected disambiguation");

    let origin = choices.origin_suggestions()[0].clone();
    let destination = choices.destination_suggestions()[0].clone();
    let outcome = choices
        .resolve_with(&mut search, &origin, &destination)
        .await
        .unwrap();
    assert!(outcome.is_found());

    let submitted = search.transport().submitted().await;
    let precise = &submitted[1];
    assert_eq!(
        precise["ix_originText"],
        "Karlsruhe, Marktplatz [Haltestelle]"
    );
    assert_eq!(
        precise["ix_destinationValue"],
        "Durlach, Bahnhof [Haltestelle]"
    );
    assert_eq!(precise["ix_originSessionValue"], "0:1");
    assert_eq!(precise["ix_destinationSessionValue"], "1234");
    assert_eq!(precise.get("nameState_origin").map(String::as_str), Some("list"));
    assert_eq!(precise.get("nameState_destination"), None);
    assert_eq!(precise["ix_travelType"], "arr");
    assert_eq!(precise["sessionID"], "KVV_SESSION");

    // The disambiguation still describes the original request
    assert_eq!(choices.request().origin(), "Marktplatz");
}

#[tokio::test]
async fn best_match_picks_closest_labels() {
    let chooser = chooser_page(&[("0:1", "xy"), ("0:2", "ab")], &[("0:3", "cd"), ("0:4", "ce")]);
    let transport = MockTransport::new()
        .with_body(chooser)
        .with_body(trips_page(&[TripFixture::default()]));
    let mut search = TripSearch::new(transport);

    let short = TripRequest::new("ab", "ce", ts(9, 55)).with_timezone(Tz::UTC);
    let choices = search
        .get_trips(short)
        .await
        .unwrap()
        .disambiguation()
        .expect("expected disambiguation");

    let precise = choices.best_match().expect("both roles have candidates");
    assert_eq!(precise.origin_session_value(), "0:2");
    assert_eq!(precise.destination_session_value(), "0:4");

    let outcome = search.get_trips(precise).await.unwrap();
    assert!(outcome.is_found());
}

#[tokio::test]
async fn next_page_skips_known_trips() {
    let transport = MockTransport::new()
        .with_body(trips_page(&[TripFixture::default(), later_trip()]))
        .with_body(trips_page(&[later_trip(), latest_trip()]));
    let mut search = TripSearch::new(transport);

    let first = search.get_trips(request()).await.unwrap().trips().unwrap();
    let next = first.next_page(&mut search).await.unwrap().trips().unwrap();

    assert_eq!(next.len(), 1);
    assert_eq!(next.trips()[0].interval_raw.0, "10:45");
    assert!(next.iter().all(|trip| !first.trips().contains(trip)));

    // Anchored at the arrival of the last trip, same travel type
    let submitted = search.transport().submitted().await;
    assert_eq!(submitted[1]["ix_hour"], "10");
    assert_eq!(submitted[1]["ix_minute"], "40");
    assert_eq!(submitted[1]["ix_travelType"], "dep");
    assert_eq!(submitted[1]["sessionID"], "KVV_SESSION");
}

#[tokio::test]
async fn previous_page_searches_by_arrival() {
    let transport = MockTransport::new()
        .with_body(trips_page(&[later_trip(), latest_trip()]))
        .with_body(trips_page(&[TripFixture::default(), later_trip()]));
    let mut search = TripSearch::new(transport);

    let current = search.get_trips(request()).await.unwrap().trips().unwrap();
    let previous = current
        .previous_page(&mut search)
        .await
        .unwrap()
        .trips()
        .unwrap();

    assert_eq!(previous.len(), 1);
    assert_eq!(previous.trips()[0].interval_raw.0, "10:00");

    let submitted = search.transport().submitted().await;
    assert_eq!(submitted[1]["ix_hour"], "10");
    assert_eq!(submitted[1]["ix_minute"], "15");
    assert_eq!(submitted[1]["ix_travelType"], "arr");
}

#[tokio::test]
async fn paging_from_an_exhausted_page_is_an_error() {
    let transport = MockTransport::new()
        .with_body(trips_page(&[TripFixture::default()]))
        .with_body(trips_page(&[TripFixture::default()]));
    let mut search = TripSearch::new(transport);

    let first = search.get_trips(request()).await.unwrap().trips().unwrap();
    let next = first.next_page(&mut search).await.unwrap().trips().unwrap();
    assert!(next.is_empty());

    let err = next.next_page(&mut search).await.unwrap_err();
    assert!(matches!(err, EfaError::EmptyCollection));
    assert_eq!(search.transport().remaining().await, 0);
}

#[tokio::test]
async fn paging_can_come_back_ambiguous() {
    let transport = MockTransport::new()
        .with_body(trips_page(&[TripFixture::default()]))
        .with_body(chooser_page(&[("0:1", "A")], &[("0:2", "B")]));
    let mut search = TripSearch::new(transport);

    let first = search.get_trips(request()).await.unwrap().trips().unwrap();
    let outcome = first.next_page(&mut search).await.unwrap();

    assert!(matches!(outcome, SearchOutcome::Ambiguous(_)));
}

#[tokio::test]
async fn autocomplete_is_cached() {
    let transport = MockTransport::new().with_body(stop_finder_json());
    let search = TripSearch::new(transport);

    let locations = search.autocomplete("Karlsruhe Hbf").await.unwrap();
    assert_eq!(locations.len(), 4);
    assert!(locations[0].is_stop());

    let again = search.autocomplete("  Karlsruhe Hbf ").await.unwrap();
    assert_eq!(again, locations);

    let submitted = search.transport().submitted().await;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0]["ix_action"], "stopRequest");
    assert_eq!(submitted[0]["name_sf"], "Karlsruhe Hbf");
    assert!(!submitted[0].contains_key("sessionID"));

    // Autocomplete leaves the session alone
    assert!(search.session().is_default());
}

#[tokio::test]
async fn autocomplete_rejects_bad_json() {
    let transport = MockTransport::new().with_body("<html>not json</html>");
    let search = TripSearch::new(transport);

    let err = search.autocomplete("Durlach").await.unwrap_err();
    assert!(matches!(err, EfaError::Json { .. }));
}
