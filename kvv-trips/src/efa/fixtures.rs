//! Response bodies shaped like the provider's views, for tests.

use super::extract::{CHOOSER_MARKER, TRIPS_MARKER};

pub const SESSION_FIELDS: &str = r#"<form name="ix_form">
<input type="hidden" id="sessionID" name="sessionID" value="KVV_SESSION">
<input type="hidden" id="requestID" name="requestID" value="2">
</form>"#;

/// Header values of one trip block. Each block has a single section from
/// Marktplatz to Durlach with two intermediate stops.
#[derive(Debug, Clone, Copy)]
pub struct TripFixture {
    pub departure: &'static str,
    pub arrival: &'static str,
    pub duration: &'static str,
    pub routes: &'static str,
    pub changes: u32,
}

impl Default for TripFixture {
    fn default() -> Self {
        Self {
            departure: "10:00",
            arrival: "10:20",
            duration: "00:20",
            routes: "with: Tram 2, S5",
            changes: 1,
        }
    }
}

impl TripFixture {
    fn render(&self, index: usize) -> String {
        format!(
            r#"<span class="fahrt">
  <div class="tab1">Trip {label}</div>
  <div class="tab2"><strong>{dep} &#150; {arr}</strong></div>
  <div class="tab3">{routes}</div>
  <div class="tab4">Duration: {duration}</div>
  <div class="tab4">Changes: {changes}</div>
  <ul class="fahrtliste">
    <li class="details">Tram 2<br>Direction Durlach<br><b>Low-floor vehicle</b><br> </li>
    <li class="fahrtenlist"><div class="tab1"><strong>{dep}</strong></div><div class="tab3"><strong>Karlsruhe, Marktplatz</strong></div></li>
    <li class="zwischenhalte"><span class="toggle"><ul>
      <li><span>10:04</span> Kronenplatz</li>
      <li><span>10:08</span> Gottesauer Platz</li>
    </ul></span></li>
    <li class="fahrtenlistende"><div class="tab1"><strong>{arr}</strong></div><div class="tab3"><strong>Durlach, Bahnhof</strong></div></li>
  </ul>
</span>"#,
            label = index + 1,
            dep = self.departure,
            arr = self.arrival,
            routes = self.routes,
            duration = self.duration,
            changes = self.changes,
        )
    }
}

fn trip_list(trips: &[TripFixture], session: &str) -> String {
    let blocks: String = trips
        .iter()
        .enumerate()
        .map(|(index, trip)| trip.render(index))
        .collect();

    format!(
        "{TRIPS_MARKER}\n<html><body>\n{session}\n<ul id=\"fahrten\">\n{blocks}\n</ul>\n</body></html>"
    )
}

/// A trip list view with session fields.
pub fn trips_page(trips: &[TripFixture]) -> String {
    trip_list(trips, SESSION_FIELDS)
}

/// A trip list view without session fields.
pub fn trips_page_without_session(trips: &[TripFixture]) -> String {
    trip_list(trips, "")
}

/// A trip list whose only block lacks the section end marker.
pub fn malformed_trips_page() -> String {
    format!(
        r#"{TRIPS_MARKER}
<html><body>
{SESSION_FIELDS}
<ul id="fahrten"><span class="fahrt">
  <div class="tab1">Trip 1</div>
  <div class="tab2"><strong>10:00 - 10:20</strong></div>
  <div class="tab3">with: Tram 2</div>
  <div class="tab4">Duration: 00:20</div>
  <div class="tab4">Changes: 0</div>
  <ul class="fahrtliste">
    <li class="details">Tram 2</li>
    <li class="fahrtenlist"><div class="tab1"><strong>10:00</strong></div><div class="tab3"><strong>Marktplatz</strong></div></li>
  </ul>
</span></ul>
</body></html>"#
    )
}

/// A chooser view with session fields. Options are (token, label).
pub fn chooser_page(origins: &[(&str, &str)], destinations: &[(&str, &str)]) -> String {
    fn options(choices: &[(&str, &str)]) -> String {
        choices
            .iter()
            .map(|(token, label)| format!("<option value=\"{token}\">{label}</option>\n"))
            .collect()
    }

    format!(
        "{CHOOSER_MARKER}\n<html><body>\n{SESSION_FIELDS}\n\
         <select id=\"ix_origin\">\n{}</select>\n\
         <select id=\"ix_destination\">\n{}</select>\n\
         </body></html>",
        options(origins),
        options(destinations),
    )
}

/// An autocomplete payload.
pub fn stop_finder_json() -> &'static str {
    r#"{"stopFinder":{"points":[
        {"name":"Karlsruhe, Hauptbahnhof","anyType":"stop"},
        {"name":"Karlsruhe, Hauptbahnhof (Vorplatz)","anyType":"loc"},
        {"name":"Karlsruhe","anyType":"poi"},
        {"name":"Karlsruhe, Hbf P+R","anyType":"parking"}
    ]}}"#
}
