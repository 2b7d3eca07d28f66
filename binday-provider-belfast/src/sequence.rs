//! Scripted walk through the council's "find bin collection day" form.

use std::thread;
use std::time::Duration;

use binday_core::{LookupRequest, LookupResponse, PortError};
use tracing::debug;

use crate::browser::{
    BrowserLauncher, BrowserSession, DriverError, Locator, SelectOption, SessionGuard,
};
use crate::parser::parse_collections;

/// Entry page of the council lookup form.
pub const LOOKUP_URL: &str = "https://online.belfastcity.gov.uk/find-bin-collection-day/Default.aspx";

const SEARCH_BY_POSTCODE: Locator = Locator::Id("searchBy_radio_1");
const POSTCODE_INPUT: Locator = Locator::Id("Postcode_textbox");
const ADDRESS_LOOKUP_BUTTON: Locator = Locator::Name("ctl00$MainContent$AddressLookup_button");
const ADDRESS_LIST: Locator = Locator::Name("ctl00$MainContent$lstAddresses");
const SELECT_ADDRESS_BUTTON: Locator = Locator::Name("ctl00$MainContent$SelectAddress_button");

const NOT_RECOGNISED_MARKER: &str = "not recognised";

/// Waits and settle delays applied while driving the form.
///
/// The settle delays are fixed sleeps; the page is assumed ready once they elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeTimings {
    /// Upper bound for each element to become interactable.
    pub element_timeout: Duration,
    /// Pause after switching the form to postcode search.
    pub after_search_mode: Duration,
    /// Pause after submitting the postcode.
    pub after_search: Duration,
    /// Pause after confirming the address.
    pub after_select: Duration,
}

impl Default for ScrapeTimings {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(10),
            after_search_mode: Duration::from_secs(1),
            after_search: Duration::from_secs(2),
            after_select: Duration::from_secs(3),
        }
    }
}

/// Run one scrape attempt in a fresh browser session.
///
/// The session is terminated exactly once whatever the outcome.
///
/// # Errors
///
/// - [`PortError::NotFound`] when the postcode is unknown or has no addresses.
/// - [`PortError::AddressProcessing`] when selecting the address or reading the results fails.
/// - [`PortError::Scrape`] for launch, navigation, and search failures.
pub fn scrape(
    launcher: &dyn BrowserLauncher,
    timings: &ScrapeTimings,
    request: &LookupRequest,
) -> Result<LookupResponse, PortError> {
    let mut session = SessionGuard::new(launcher.launch().map_err(scrape_failure)?);
    let outcome = run_sequence(&mut *session, timings, request);
    session.release();
    outcome
}

fn run_sequence(
    session: &mut dyn BrowserSession,
    timings: &ScrapeTimings,
    request: &LookupRequest,
) -> Result<LookupResponse, PortError> {
    search_postcode(session, timings, &request.postcode).map_err(scrape_failure)?;

    let page = session.read_document().map_err(scrape_failure)?;
    if page.to_lowercase().contains(NOT_RECOGNISED_MARKER) {
        return Err(PortError::NotFound("Postcode not found".to_owned()));
    }

    session
        .wait_interactable(ADDRESS_LIST, timings.element_timeout)
        .map_err(scrape_failure)?;
    let options = session.options(ADDRESS_LIST).map_err(scrape_failure)?;
    let candidates = address_candidates(options, &request.postcode);
    debug!(candidates = candidates.len(), "Address options read");

    let Some(chosen) = choose_address(&candidates, request.house_number()) else {
        return Err(PortError::NotFound(
            "No addresses found for this postcode".to_owned(),
        ));
    };

    confirm_address(session, timings, chosen)
        .map_err(|err| PortError::AddressProcessing(format!("Error processing address: {err}")))
}

fn search_postcode(
    session: &mut dyn BrowserSession,
    timings: &ScrapeTimings,
    postcode: &str,
) -> Result<(), DriverError> {
    debug!(url = LOOKUP_URL, "Opening lookup form");
    session.navigate(LOOKUP_URL)?;

    session.wait_interactable(SEARCH_BY_POSTCODE, timings.element_timeout)?;
    session.click(SEARCH_BY_POSTCODE)?;
    pause(timings.after_search_mode);

    session.wait_interactable(POSTCODE_INPUT, timings.element_timeout)?;
    session.fill(POSTCODE_INPUT, postcode)?;

    session.wait_interactable(ADDRESS_LOOKUP_BUTTON, timings.element_timeout)?;
    session.click(ADDRESS_LOOKUP_BUTTON)?;
    pause(timings.after_search);

    Ok(())
}

fn confirm_address(
    session: &mut dyn BrowserSession,
    timings: &ScrapeTimings,
    chosen: &SelectOption,
) -> Result<LookupResponse, DriverError> {
    debug!(address = chosen.text.as_str(), "Selecting address");
    session.select_option(ADDRESS_LIST, &chosen.value)?;

    session.wait_interactable(SELECT_ADDRESS_BUTTON, timings.element_timeout)?;
    session.click(SELECT_ADDRESS_BUTTON)?;
    pause(timings.after_select);

    let html = session.read_document()?;
    let collections = parse_collections(&html);
    debug!(collections = collections.len(), "Result tables parsed");

    Ok(LookupResponse::scraped(chosen.text.clone(), collections))
}

/// Drop the "Select the {postcode} address from the list." placeholder.
pub(crate) fn address_candidates(options: Vec<SelectOption>, postcode: &str) -> Vec<SelectOption> {
    let placeholder = format!("Select the {postcode} address from the list.");
    options
        .into_iter()
        .filter(|option| option.value != placeholder && option.text != placeholder)
        .collect()
}

/// First candidate containing the house number, else the first candidate.
pub(crate) fn choose_address<'list>(
    candidates: &'list [SelectOption],
    house_number: Option<&str>,
) -> Option<&'list SelectOption> {
    house_number
        .map(str::to_lowercase)
        .and_then(|needle| {
            candidates
                .iter()
                .find(|candidate| candidate.text.to_lowercase().contains(&needle))
        })
        .or_else(|| candidates.first())
}

fn scrape_failure(err: DriverError) -> PortError {
    PortError::Scrape(format!("Scraping error: {err}"))
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
