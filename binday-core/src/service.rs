//! High-level service facade that always answers with a schedule.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::mock::mock_schedule;
use crate::model::{CouncilMeta, LookupRequest, LookupResponse};
use crate::ports::CollectionPort;

/// Public entry point for bin schedule lookups.
///
/// Provider failures never reach the caller: they are logged and replaced by
/// the mock schedule, flagged through [`LookupResponse::is_fallback`].
pub struct BinLookupService {
    port: Arc<dyn CollectionPort>,
    today: fn() -> NaiveDate,
}

impl BinLookupService {
    /// Create a new service bound to the provided port.
    #[must_use]
    pub fn new(port: Arc<dyn CollectionPort>) -> Self {
        Self {
            port,
            today: local_today,
        }
    }

    /// Replace the clock used to date fallback schedules.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Council served by the underlying port.
    #[must_use]
    pub fn council(&self) -> &CouncilMeta {
        self.port.council()
    }

    /// Look up a schedule, substituting mock data on any provider error.
    pub async fn lookup(&self, request: &LookupRequest) -> LookupResponse {
        let council = self.port.council();
        info!(
            council = council.id.as_str(),
            postcode = request.postcode.as_str(),
            house_number = request.house_number(),
            "Bin lookup request"
        );

        match self.port.lookup(request).await {
            Ok(response) => {
                info!(
                    council = council.id.as_str(),
                    address = response.address(),
                    collections = response.collections().len(),
                    "Bin lookup completed"
                );
                response
            }
            Err(err) => {
                warn!(
                    council = council.id.as_str(),
                    postcode = request.postcode.as_str(),
                    status = err.status_code(),
                    error = %err,
                    "Scraping failed, using mock data"
                );
                mock_schedule(&request.postcode, request.house_number(), (self.today)())
            }
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
