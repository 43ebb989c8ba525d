//! Classification and extraction of the provider's markup responses.
//!
//! The provider answers a trip search with one of two HTML views, each
//! tagged by a fixed comment on its first line: a "chooser" asking which of
//! several locations was meant, or a trip list. Anything else means the
//! provider found nothing to offer.
//!
//! `Html` is not `Send`, so a [`ResponseDocument`] must be fully consumed
//! before the caller awaits again.

use chrono_tz::Tz;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};

use crate::domain::{Section, Session, Station, Trip, TripSuggestion};

/// First line of the disambiguation view.
pub const CHOOSER_MARKER: &str =
    "<!-- ix_chooser.html  DO NOT CHANGE THIS FIRST LINE: parsed in javascript !!-->";

/// First line of the trip list view.
pub const TRIPS_MARKER: &str = "<!-- ix_trips.html  DO NOT CHANGE THIS FIRST LINE-->";

/// Windows-1252 en dash the provider emits in time intervals.
const DASH_ENTITY: &str = "&#150;";

lazy_static! {
    static ref SESSION_ID: Selector = Selector::parse("#sessionID").unwrap();
    static ref REQUEST_ID: Selector = Selector::parse("#requestID").unwrap();
    static ref ORIGIN_CHOOSER: Selector = Selector::parse("#ix_origin").unwrap();
    static ref DESTINATION_CHOOSER: Selector = Selector::parse("#ix_destination").unwrap();
    static ref OPTION: Selector = Selector::parse("option").unwrap();
    static ref TRIP_BLOCK: Selector = Selector::parse("ul#fahrten > span").unwrap();
    static ref LABEL_CELL: Selector = Selector::parse(".tab1").unwrap();
    static ref INTERVAL_CELL: Selector = Selector::parse(".tab2 strong").unwrap();
    static ref ROUTES_CELL: Selector = Selector::parse(".tab3").unwrap();
    static ref SUMMARY_CELL: Selector = Selector::parse(".tab4").unwrap();
    static ref SECTION_LIST: Selector = Selector::parse("ul.fahrtliste").unwrap();
    static ref LIST_ITEM: Selector = Selector::parse("li").unwrap();
    static ref SECTION_START: Selector = Selector::parse("li.fahrtenlist").unwrap();
    static ref SECTION_END: Selector = Selector::parse("li.fahrtenlistende").unwrap();
    static ref TIME_CELL: Selector = Selector::parse(".tab1 strong").unwrap();
    static ref PLACE_CELL: Selector = Selector::parse(".tab3 strong").unwrap();
    static ref STATION_ITEM: Selector = Selector::parse("span.toggle li").unwrap();
    static ref STATION_TIME: Selector = Selector::parse("span").unwrap();
}

/// A recognised view did not have the structure it should.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A required element was not found
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// An element was found but its content could not be read
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Which view a response body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Chooser,
    Trips,
    Unrecognised,
}

/// What a response offered.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePage {
    /// Candidates for each end of the trip, in provider order.
    Chooser {
        origins: Vec<TripSuggestion>,
        destinations: Vec<TripSuggestion>,
    },
    /// At least one trip.
    Trips(Vec<Trip>),
    /// Neither candidates nor trips.
    NoTarget,
}

/// Replace the dash entity the provider uses in intervals with `-`.
pub fn normalize_body(body: &str) -> String {
    body.replace(DASH_ENTITY, "-")
}

/// A parsed response body.
pub struct ResponseDocument {
    kind: PageKind,
    html: Html,
}

impl ResponseDocument {
    /// Normalise and parse a raw response body.
    pub fn parse(body: &str) -> Self {
        let body = normalize_body(body);

        // The chooser wins if a body somehow carries both markers.
        let kind = if body.contains(CHOOSER_MARKER) {
            PageKind::Chooser
        } else if body.contains(TRIPS_MARKER) {
            PageKind::Trips
        } else {
            PageKind::Unrecognised
        };

        Self {
            kind,
            html: Html::parse_document(&body),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// The session the provider handed out with this response, if it
    /// carried both identifier fields.
    pub fn session(&self) -> Option<Session> {
        let session_id = self.html.select(&SESSION_ID).next()?;
        let request_id = self.html.select(&REQUEST_ID).next()?;

        Some(Session::new(
            session_id.value().attr("value").unwrap_or_default(),
            request_id.value().attr("value").unwrap_or_default(),
        ))
    }

    /// Extract the page content.
    ///
    /// Trips are anchored at `request_timestamp` in `timezone`, the instant
    /// their bare times of day will later be resolved against.
    pub fn extract(
        &self,
        request_timestamp: i64,
        timezone: Tz,
    ) -> Result<ResponsePage, ExtractError> {
        match self.kind {
            PageKind::Chooser => self.extract_chooser(),
            PageKind::Trips => {
                let trips = self
                    .html
                    .select(&TRIP_BLOCK)
                    .map(|block| extract_trip(block, request_timestamp, timezone))
                    .collect::<Result<Vec<_>, _>>()?;

                if trips.is_empty() {
                    Ok(ResponsePage::NoTarget)
                } else {
                    Ok(ResponsePage::Trips(trips))
                }
            }
            PageKind::Unrecognised => Ok(ResponsePage::NoTarget),
        }
    }

    fn extract_chooser(&self) -> Result<ResponsePage, ExtractError> {
        let origins = self
            .html
            .select(&ORIGIN_CHOOSER)
            .next()
            .ok_or(ExtractError::MissingElement("#ix_origin"))?;
        let destinations = self
            .html
            .select(&DESTINATION_CHOOSER)
            .next()
            .ok_or(ExtractError::MissingElement("#ix_destination"))?;

        Ok(ResponsePage::Chooser {
            origins: suggestions(origins),
            destinations: suggestions(destinations),
        })
    }
}

fn suggestions(chooser: ElementRef<'_>) -> Vec<TripSuggestion> {
    chooser
        .select(&OPTION)
        .map(|option| {
            TripSuggestion::new(
                option.value().attr("value").unwrap_or_default(),
                option.text().collect::<String>(),
            )
        })
        .collect()
}

fn extract_trip(
    block: ElementRef<'_>,
    request_timestamp: i64,
    timezone: Tz,
) -> Result<Trip, ExtractError> {
    // Header cells precede the section lists, so the first match of each
    // cell selector is the trip header.
    let label = text_of(first(block, &LABEL_CELL, ".tab1")?);

    let interval = text_of(first(block, &INTERVAL_CELL, ".tab2 strong")?);
    let interval_raw = split_interval(&interval)?;

    let mut summary = block.select(&SUMMARY_CELL);
    let duration = summary
        .next()
        .map(text_of)
        .ok_or(ExtractError::MissingElement(".tab4"))?;
    let changes = summary
        .next()
        .map(text_of)
        .ok_or(ExtractError::MissingElement(".tab4"))?;

    let routes = text_of(first(block, &ROUTES_CELL, ".tab3")?);

    let sections = block
        .select(&SECTION_LIST)
        .map(extract_section)
        .collect::<Result<Vec<_>, _>>()?;

    if sections.is_empty() {
        return Err(ExtractError::MissingElement("ul.fahrtliste"));
    }

    Ok(Trip {
        label,
        interval_raw,
        duration_raw: last_five(&duration)?,
        routes_used: split_routes(&routes),
        change_count: parse_changes(&changes)?,
        sections,
        request_timestamp,
        timezone,
    })
}

fn extract_section(list: ElementRef<'_>) -> Result<Section, ExtractError> {
    let details = first(list, &LIST_ITEM, "ul.fahrtliste li")?;

    let start = first(list, &SECTION_START, "li.fahrtenlist")?;
    let end = first(list, &SECTION_END, "li.fahrtenlistende")?;

    let stations = list
        .select(&STATION_ITEM)
        .map(extract_station)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Section {
        info_lines: info_lines(details),
        origin_time: text_of(first(start, &TIME_CELL, "li.fahrtenlist .tab1 strong")?),
        origin_place: text_of(first(start, &PLACE_CELL, "li.fahrtenlist .tab3 strong")?),
        destination_time: text_of(first(end, &TIME_CELL, "li.fahrtenlistende .tab1 strong")?),
        destination_place: text_of(first(
            end,
            &PLACE_CELL,
            "li.fahrtenlistende .tab3 strong",
        )?),
        stations,
    })
}

fn extract_station(item: ElementRef<'_>) -> Result<Station, ExtractError> {
    let time = text_of(first(item, &STATION_TIME, "span.toggle li span")?);
    let name = item
        .text()
        .collect::<String>()
        .replace(&time, "")
        .trim()
        .to_string();

    Ok(Station { name, time })
}

/// Text of an element split at `<br>`, with blank lines dropped.
fn info_lines(item: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for node in item.descendants() {
        match node.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(element) if element.name() == "br" => {
                lines.push(std::mem::take(&mut current));
            }
            _ => {}
        }
    }
    lines.push(current);

    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn split_interval(interval: &str) -> Result<(String, String), ExtractError> {
    let mut parts = interval.split('-').map(str::trim);

    match (parts.next(), parts.next()) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
            Ok((start.to_string(), end.to_string()))
        }
        _ => Err(ExtractError::InvalidField {
            field: "interval",
            value: interval.to_string(),
        }),
    }
}

/// The duration cell ends in a fixed-width "HH:MM".
fn last_five(duration: &str) -> Result<String, ExtractError> {
    let start = duration
        .char_indices()
        .rev()
        .nth(4)
        .map(|(index, _)| index)
        .ok_or_else(|| ExtractError::InvalidField {
            field: "duration",
            value: duration.to_string(),
        })?;

    Ok(duration[start..].to_string())
}

fn split_routes(routes: &str) -> Vec<String> {
    match routes.split_once("with:") {
        Some((_, used)) => used
            .split(',')
            .map(str::trim)
            .filter(|route| !route.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn parse_changes(changes: &str) -> Result<u32, ExtractError> {
    changes
        .split_once("Changes: ")
        .and_then(|(_, count)| count.trim().parse().ok())
        .ok_or_else(|| ExtractError::InvalidField {
            field: "changes",
            value: changes.to_string(),
        })
}

fn first<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    name: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    scope
        .select(selector)
        .next()
        .ok_or(ExtractError::MissingElement(name))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
