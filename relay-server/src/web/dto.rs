//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::transit::NextDeparture;

/// Query for `GET /nextrain`.
#[derive(Debug, Deserialize)]
pub struct NextTrainRequest {
    /// Departure station name
    pub from: Option<String>,

    /// Arrival station name
    pub to: Option<String>,

    /// `normal` (default) or `verbose`
    pub res_type: Option<String>,
}

/// Output format for `GET /nextrain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Plain text countdown, `M:SS`
    #[default]
    Normal,
    /// JSON with station names and times
    Verbose,
}

impl ResponseType {
    /// Parse the `res_type` parameter; unknown values fall back to normal.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("normal") => ResponseType::Normal,
            Some("verbose") => ResponseType::Verbose,
            Some(other) => {
                warn!(res_type = other, "invalid res_type, defaulting to normal");
                ResponseType::Normal
            }
        }
    }
}

/// Verbose `GET /nextrain` response.
#[derive(Debug, Serialize)]
pub struct NextTrainVerbose {
    pub station_from: String,
    pub station_to: String,

    /// Departure time, `HH:MM`
    pub next_time: String,

    /// Whole seconds until departure (0 once departed)
    pub diff_seconds: i64,

    /// Countdown, `M:SS`
    pub diff_time: String,

    /// Whether the departure time has already passed
    pub departed: bool,
}

impl NextTrainVerbose {
    pub fn new(from: &str, to: &str, next: &NextDeparture) -> Self {
        Self {
            station_from: from.to_string(),
            station_to: to.to_string(),
            next_time: next.time_of_day(),
            diff_seconds: next.countdown.remaining_seconds(),
            diff_time: next.countdown.to_string(),
            departed: next.countdown.is_departed(),
        }
    }
}

/// Form body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub question: Option<String>,
}

/// Query for `GET /voice`.
#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    /// Voice name, e.g. `jp_women`
    pub speaker: Option<String>,
    pub message: Option<String>,
}
