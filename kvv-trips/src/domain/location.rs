//! Locations offered by the provider's autocomplete.

/// What kind of place a [`Location`] is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationKind {
    /// A tram or bus stop. Trips always start and end at one.
    Stop,
    /// A street or other named place.
    Address,
    /// A wider area such as a town or district.
    PointOfInterest,
    /// A type code this crate does not know.
    Other(String),
}

impl LocationKind {
    /// Parse a provider type code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "stop" => LocationKind::Stop,
            "loc" => LocationKind::Address,
            "poi" => LocationKind::PointOfInterest,
            other => LocationKind::Other(other.to_string()),
        }
    }

    /// Provider type code.
    pub fn code(&self) -> &str {
        match self {
            LocationKind::Stop => "stop",
            LocationKind::Address => "loc",
            LocationKind::PointOfInterest => "poi",
            LocationKind::Other(code) => code,
        }
    }
}

/// A named place matching an autocomplete query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub kind: LocationKind,
}

impl Location {
    pub fn new(name: impl Into<String>, kind: LocationKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.kind == LocationKind::Stop
    }
}
