//! Next-train lookup against a transit route search page.
//!
//! The search result page is fetched as HTML, the next departure time is
//! pulled out by [`TimetableExtractor`], and the time is compared with the
//! current instant in the configured civil time zone.
//!
//! Key characteristics of the page:
//! - Only the printable view is scraped; it has stable markup
//! - Times are "HH:MM" local time followed by `発→`
//! - No date is given, so the departure is assumed to be today (or
//!   tomorrow, for after-midnight trains)

mod client;
mod departure;
mod error;
mod extractor;
mod finder;

pub use client::{TransitClient, TransitConfig};
pub use departure::{
    ARROW_GLYPH, Countdown, DEPARTED_MARKER, NextDeparture, departure_instant,
    parse_departure_time, strip_departure_markers,
};
pub use error::TransitError;
pub use extractor::{MarkupEvent, MarkupPattern, PRINT_PAGE_PATTERN, ScanState, TimetableExtractor};
pub use finder::NextTrainFinder;
