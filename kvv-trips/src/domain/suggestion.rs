//! Disambiguation candidates.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Bracketed qualifiers such as "[Haltestelle]" or "[Adresse]".
    static ref QUALIFIER: Regex = Regex::new(r"\[(.*?)\]").unwrap();
}

/// Which end of the trip a suggestion is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionRole {
    Origin,
    Destination,
}

/// One candidate location offered by the provider when a name was
/// ambiguous.
///
/// `raw_label` keeps the provider's type marker (stop, address, ...), which
/// matching relies on. `display_name` has it stripped for presentation.
///
/// # Examples
///
/// ```
/// use kvv_trips::domain::TripSuggestion;
///
/// let s = TripSuggestion::new("0:1", "Karlsruhe, Hauptbahnhof [Haltestelle]");
/// assert_eq!(s.token(), "0:1");
/// assert_eq!(s.display_name(), "Karlsruhe, Hauptbahnhof");
/// assert_eq!(s.raw_label(), "Karlsruhe, Hauptbahnhof [Haltestelle]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSuggestion {
    token: String,
    display_name: String,
    raw_label: String,
}

impl TripSuggestion {
    /// Build a suggestion from the provider token and the option label.
    pub fn new(token: impl Into<String>, raw_label: impl Into<String>) -> Self {
        let raw_label = raw_label.into().trim().to_string();
        let display_name = strip_qualifiers(&raw_label);

        Self {
            token: token.into(),
            display_name,
            raw_label,
        }
    }

    /// Provider token identifying this candidate in a follow-up request.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Label without bracketed qualifiers.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Label exactly as the provider rendered it.
    pub fn raw_label(&self) -> &str {
        &self.raw_label
    }
}

fn strip_qualifiers(label: &str) -> String {
    QUALIFIER.replace_all(label, "").trim().to_string()
}
