//! Autocomplete response DTOs.
//!
//! The stop finder answers in JSON, unlike the trip search. The provider
//! sends `null` or omits `points` when nothing matches.

use serde::Deserialize;

use crate::domain::{Location, LocationKind};

/// Response to a `stopRequest`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopFinderResponse {
    pub stop_finder: StopFinder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopFinder {
    #[serde(default)]
    pub points: Option<Vec<StopPoint>>,
}

/// One match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPoint {
    pub name: String,

    /// Type code such as "stop", "loc" or "poi".
    #[serde(default)]
    pub any_type: String,
}

impl StopFinderResponse {
    /// Matches in provider order.
    pub fn into_locations(self) -> Vec<Location> {
        self.stop_finder
            .points
            .unwrap_or_default()
            .into_iter()
            .map(|point| Location::new(point.name, LocationKind::from_code(&point.any_type)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efa::fixtures::stop_finder_json;

    #[test]
    fn deserialize_stop_finder() {
        let response: StopFinderResponse = serde_json::from_str(stop_finder_json()).unwrap();
        let locations = response.into_locations();

        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0].name, "Karlsruhe, Hauptbahnhof");
        assert_eq!(locations[0].kind, LocationKind::Stop);
        assert_eq!(locations[1].kind, LocationKind::Address);
        assert_eq!(locations[2].kind, LocationKind::PointOfInterest);
        assert_eq!(
            locations[3].kind,
            LocationKind::Other("parking".to_string())
        );
    }

    #[test]
    fn missing_points_means_no_matches() {
        let response: StopFinderResponse =
            serde_json::from_str(r#"{"stopFinder":{"points":null}}"#).unwrap();
        assert!(response.into_locations().is_empty());

        let response: StopFinderResponse =
            serde_json::from_str(r#"{"stopFinder":{}}"#).unwrap();
        assert!(response.into_locations().is_empty());
    }
}
