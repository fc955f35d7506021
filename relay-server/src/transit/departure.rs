//! Turning an extracted departure string into a countdown.
//!
//! The result page shows times like `"19:34発→"`: a 24-hour local time
//! followed by a "departs" marker and an arrow. Only hour and minute are
//! given, so the departure is placed on today's date in the civil time zone
//! of the reference instant, with seconds set to zero.

use std::fmt;

use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::error::TransitError;

/// Marker appended to departure times ("departs").
pub const DEPARTED_MARKER: &str = "発";

/// Arrow glyph appended after the marker.
pub const ARROW_GLYPH: &str = "→";

/// A departure this far before "now" is taken to be tomorrow's.
const ROLLOVER_HOURS: i64 = 12;

/// Remove the departure marker and arrow, and surrounding whitespace.
///
/// ```
/// use relay_server::transit::strip_departure_markers;
///
/// assert_eq!(strip_departure_markers("19:34発→"), "19:34");
/// assert_eq!(strip_departure_markers(" 7:05発→ "), "7:05");
/// ```
pub fn strip_departure_markers(raw: &str) -> String {
    raw.replace(DEPARTED_MARKER, "")
        .replace(ARROW_GLYPH, "")
        .trim()
        .to_string()
}

/// Parse `H:MM` or `HH:MM` (24-hour) into a time of day with zero seconds.
pub fn parse_departure_time(s: &str) -> Result<NaiveTime, TransitError> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| TransitError::malformed(s, "expected HH:MM format"))?;

    let hour = parse_digits(hour, 1..=2)
        .ok_or_else(|| TransitError::malformed(s, "invalid hour digits"))?;
    if hour > 23 {
        return Err(TransitError::malformed(s, "hour must be 0-23"));
    }

    let minute = parse_digits(minute, 2..=2)
        .ok_or_else(|| TransitError::malformed(s, "invalid minute digits"))?;
    if minute > 59 {
        return Err(TransitError::malformed(s, "minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| TransitError::malformed(s, "invalid time"))
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Place `time` on the same local date as `now`.
///
/// If that lands more than [`ROLLOVER_HOURS`] in the past, the departure is
/// the next day's (a late-evening search showing an after-midnight train).
pub fn departure_instant(time: NaiveTime, now: DateTime<Tz>) -> Result<DateTime<Tz>, TransitError> {
    let tz = now.timezone();
    let local = |date: chrono::NaiveDate| {
        tz.from_local_datetime(&date.and_time(time))
            .earliest()
            .ok_or_else(|| TransitError::NonexistentLocalTime(time.format("%H:%M").to_string()))
    };

    let today = now.date_naive();
    let departure = local(today)?;
    if now - departure > Duration::hours(ROLLOVER_HOURS) {
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| TransitError::NonexistentLocalTime(time.format("%H:%M").to_string()))?;
        return local(tomorrow);
    }
    Ok(departure)
}

/// Time left until a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// The train has not left yet.
    Upcoming(Duration),
    /// The departure time is already behind the reference instant.
    Departed { since: Duration },
}

impl Countdown {
    /// Compare a departure with the reference instant.
    pub fn between(departure: DateTime<Tz>, now: DateTime<Tz>) -> Self {
        let diff = departure - now;
        if diff < Duration::zero() {
            Countdown::Departed { since: -diff }
        } else {
            Countdown::Upcoming(diff)
        }
    }

    /// Remaining time, clamped to zero once departed.
    pub fn remaining(&self) -> Duration {
        match self {
            Countdown::Upcoming(d) => *d,
            Countdown::Departed { .. } => Duration::zero(),
        }
    }

    /// Remaining whole seconds, clamped to zero once departed.
    pub fn remaining_seconds(&self) -> i64 {
        self.remaining().num_seconds()
    }

    pub fn is_departed(&self) -> bool {
        matches!(self, Countdown::Departed { .. })
    }
}

/// Formats as `M:SS`; a departed countdown shows `0:00`.
impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.remaining_seconds();
        write!(f, "{}:{:02}", secs / 60, secs % 60)
    }
}

/// The next departure and how long until it leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextDeparture {
    pub departs_at: DateTime<Tz>,
    pub countdown: Countdown,
}

impl NextDeparture {
    /// Build from the raw extracted text (e.g. `"19:34発→"`).
    pub fn from_raw(raw: &str, now: DateTime<Tz>) -> Result<Self, TransitError> {
        let stripped = strip_departure_markers(raw);
        let time = parse_departure_time(&stripped)?;
        let departs_at = departure_instant(time, now)?;

        Ok(Self {
            departs_at,
            countdown: Countdown::between(departs_at, now),
        })
    }

    /// Departure time of day as `HH:MM`.
    pub fn time_of_day(&self) -> String {
        self.departs_at.format("%H:%M").to_string()
    }
}
