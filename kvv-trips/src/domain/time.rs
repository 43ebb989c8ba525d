//! Time normalisation for provider time strings.
//!
//! The trip search only ever reports a bare time of day ("HH:MM"). Other
//! provider texts use relative phrases ("sofort", "5 min", "2h"). This
//! module turns those strings into absolute instants relative to a
//! reference instant, inferring whether a bare time of day belongs to
//! the day after the reference.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Error returned when a time string cannot be normalised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// How many minutes a candidate may trail the reference minute (within the
/// same hour) before it is read as belonging to the next day.
pub const ROLLOVER_TOLERANCE_MINS: u32 = 30;

/// Phrases meaning "departing right now".
const IMMEDIATE_PHRASES: [&str; 4] = ["immediately", "now", "sofort", "0"];

/// Parse a time of day in "HH:MM" (or "H:MM") format.
///
/// # Examples
///
/// ```
/// use kvv_trips::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("9:05").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("1430").is_err());
/// assert!(parse_hhmm("14:3").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let (hour, minute) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

    if hour.is_empty() || hour.len() > 2 {
        return Err(TimeError::new("invalid hour digits"));
    }
    let hour = parse_digits(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    if minute.len() != 2 {
        return Err(TimeError::new("invalid minute digits"));
    }
    let minute = parse_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse a duration in "HH:MM" format. Hours are not limited to a day.
pub fn parse_duration_hhmm(s: &str) -> Result<Duration, TimeError> {
    let (hours, minutes) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| TimeError::new("expected HH:MM duration"))?;
    let hours = parse_digits(hours).ok_or_else(|| TimeError::new("invalid duration hours"))?;
    let minutes =
        parse_digits(minutes).ok_or_else(|| TimeError::new("invalid duration minutes"))?;

    Ok(Duration::hours(i64::from(hours)) + Duration::minutes(i64::from(minutes)))
}

/// Interpret a unix timestamp (seconds) in the given zone.
pub fn instant(timestamp: i64, tz: Tz) -> Result<DateTime<Tz>, TimeError> {
    tz.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| TimeError::new("timestamp out of range"))
}

/// Resolve a bare "HH:MM" against a reference instant.
///
/// The candidate is placed on the day after the reference when its hour is
/// earlier than the reference hour, or when its hour is not later and its
/// minute trails the reference minute by more than
/// [`ROLLOVER_TOLERANCE_MINS`]. Otherwise it lands on the reference day.
///
/// The rule only compares hour and minute fields separately, so a result a
/// single minute before the reference (22:06 against 22:07) stays on the
/// same day, while 22:06 against 23:00 rolls over.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use kvv_trips::domain::resolve_time_of_day;
///
/// let reference = Tz::UTC.with_ymd_and_hms(2024, 1, 1, 23, 50, 0).unwrap();
///
/// let same_day = resolve_time_of_day("23:55", reference).unwrap();
/// assert_eq!(same_day, Tz::UTC.with_ymd_and_hms(2024, 1, 1, 23, 55, 0).unwrap());
///
/// let next_day = resolve_time_of_day("00:05", reference).unwrap();
/// assert_eq!(next_day, Tz::UTC.with_ymd_and_hms(2024, 1, 2, 0, 5, 0).unwrap());
/// ```
pub fn resolve_time_of_day(text: &str, reference: DateTime<Tz>) -> Result<DateTime<Tz>, TimeError> {
    let time = parse_hhmm(text)?;
    let reference_date = reference.date_naive();

    let date = if rolls_over(time, reference.time()) {
        reference_date
            .succ_opt()
            .ok_or_else(|| TimeError::new("date overflow"))?
    } else {
        reference_date
    };

    localize(reference.timezone(), date, time)
}

/// Normalise any provider time string against a reference instant.
///
/// Accepted forms:
/// - `"immediately"`, `"now"`, `"sofort"` or `"0"`: the reference itself
/// - `"<N>min"` / `"<N> min"`: N minutes after the reference
/// - `"<N>h"`: N hours after the reference
/// - a day phrase (`today`/`heute`, `tomorrow`/`morgen`,
///   `yesterday`/`gestern`), optionally followed by "HH:MM"
/// - "HH:MM": see [`resolve_time_of_day`]
pub fn normalize(text: &str, reference: DateTime<Tz>) -> Result<DateTime<Tz>, TimeError> {
    let phrase = text.trim().to_lowercase();
    if phrase.is_empty() {
        return Err(TimeError::new("empty time string"));
    }

    if IMMEDIATE_PHRASES.contains(&phrase.as_str()) {
        return Ok(reference);
    }

    if let Some(minutes) = phrase.strip_suffix("min") {
        let minutes = parse_offset(minutes)?;
        return reference
            .checked_add_signed(Duration::minutes(minutes))
            .ok_or_else(|| TimeError::new("time overflow"));
    }

    if let Some(hours) = phrase.strip_suffix('h') {
        let hours = parse_offset(hours)?;
        return reference
            .checked_add_signed(Duration::hours(hours))
            .ok_or_else(|| TimeError::new("time overflow"));
    }

    if let Some((days, rest)) = day_phrase(&phrase) {
        let date = shift_date(reference.date_naive(), days)?;
        let time = if rest.is_empty() {
            reference.time()
        } else {
            parse_hhmm(rest)?
        };
        return localize(reference.timezone(), date, time);
    }

    resolve_time_of_day(&phrase, reference)
}

/// Normalise a provider time string against a unix reference timestamp,
/// returning unix seconds.
pub fn normalize_timestamp(text: &str, reference: i64, tz: Tz) -> Result<i64, TimeError> {
    Ok(normalize(text, instant(reference, tz)?)?.timestamp())
}

fn rolls_over(candidate: NaiveTime, reference: NaiveTime) -> bool {
    candidate.hour() < reference.hour()
        || (candidate.hour() <= reference.hour()
            && candidate.minute() + ROLLOVER_TOLERANCE_MINS < reference.minute())
}

/// Split a leading day word off the phrase, returning its day offset and the
/// remainder.
fn day_phrase(phrase: &str) -> Option<(i64, &str)> {
    let (word, rest) = match phrase.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (phrase, ""),
    };

    let days = match word {
        "today" | "heute" => 0,
        "tomorrow" | "morgen" => 1,
        "yesterday" | "gestern" => -1,
        _ => return None,
    };

    Some((days, rest))
}

fn shift_date(date: NaiveDate, days: i64) -> Result<NaiveDate, TimeError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| TimeError::new("date overflow"))
}

fn localize(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>, TimeError> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| TimeError::new("local time does not exist"))
}

fn parse_offset(s: &str) -> Result<i64, TimeError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| TimeError::new("invalid relative offset"))
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
