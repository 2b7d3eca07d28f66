//! Provider implementation for Belfast City Council using its ASP.NET lookup form.
//!
//! The council publishes no API, so each lookup drives a headless browser through
//! the form and reads the resulting tables.

/// Browser capability traits and the session guard.
pub mod browser;
/// Headless Chrome implementation of the browser capability.
pub mod chrome;
mod parser;
mod sequence;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use binday_core::{CollectionPort, CouncilMeta, LookupRequest, LookupResponse, PortError};

use crate::browser::BrowserLauncher;
use crate::chrome::{BrowserConfig, ChromeLauncher};

pub use parser::{classify_color, parse_collections};
pub use sequence::{LOOKUP_URL, ScrapeTimings, scrape};

/// Schedule lookup for Belfast.
pub struct BelfastPort {
    launcher: Arc<dyn BrowserLauncher>,
    timings: ScrapeTimings,
    meta: CouncilMeta,
}

impl BelfastPort {
    /// Create a new port that opens browsers through `launcher`.
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            timings: ScrapeTimings::default(),
            meta: council_meta(),
        }
    }

    /// Override the waits used while driving the form.
    #[must_use]
    pub fn with_timings(mut self, timings: ScrapeTimings) -> Self {
        self.timings = timings;
        self
    }
}

#[async_trait]
impl CollectionPort for BelfastPort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResponse, PortError> {
        let launcher = Arc::clone(&self.launcher);
        let timings = self.timings;
        let request = request.clone();

        // The browser calls block, keep them off the async workers.
        tokio::task::spawn_blocking(move || scrape(launcher.as_ref(), &timings, &request))
            .await
            .map_err(|err| PortError::Internal(format!("Scrape task failed: {err}")))?
    }
}

/// Build the Belfast port backed by headless Chrome.
#[must_use]
pub fn port(config: BrowserConfig) -> BelfastPort {
    BelfastPort::new(Arc::new(ChromeLauncher::new(config)))
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: String::from("belfast"),
        name: String::from("Belfast City Council"),
    }
}
