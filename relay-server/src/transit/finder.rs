//! Next-train lookup: fetch, extract, and compute the countdown.

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::debug;

use super::client::TransitClient;
use super::departure::NextDeparture;
use super::error::TransitError;
use super::extractor::TimetableExtractor;

/// Looks up the next departure between two stations.
#[derive(Debug, Clone)]
pub struct NextTrainFinder {
    client: TransitClient,
}

impl NextTrainFinder {
    pub fn new(client: TransitClient) -> Self {
        Self { client }
    }

    /// Find the next departure from `from` to `to`, measured against `now`.
    ///
    /// A page without the departure structure is [`TransitError::NotFound`];
    /// a departure text that is not a time is [`TransitError::MalformedTime`].
    pub async fn find(
        &self,
        from: &str,
        to: &str,
        now: DateTime<Tz>,
    ) -> Result<NextDeparture, TransitError> {
        let page = self.client.fetch_result_page(from, to).await?;

        let raw = TimetableExtractor::extract_from_html(&page);
        if raw.is_empty() {
            return Err(TransitError::NotFound);
        }
        debug!(raw = %raw, "extracted departure text");

        let next = NextDeparture::from_raw(&raw, now)?;
        debug!(departs_at = %next.departs_at, countdown = %next.countdown, "next departure");

        Ok(next)
    }
}
