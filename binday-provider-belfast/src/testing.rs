//! Scripted in-memory browser used by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;

use crate::browser::{BrowserLauncher, BrowserSession, DriverError, Locator, SelectOption};
use crate::sequence::ScrapeTimings;

const RESULTS_PAGE: &str = r"<html><body>
<table id='ItemsGrid'>
  <tr><th>Bin</th><th>Collection day</th><th>Next collection</th></tr>
  <tr><td>General Waste</td><td>Tue 20 Oct 2026</td></tr>
  <tr><td>Recycling (Blue Bin)</td><td>Tue 27 Oct 2026</td></tr>
</table>
</body></html>";

pub(crate) fn instant_timings() -> ScrapeTimings {
    ScrapeTimings {
        element_timeout: Duration::ZERO,
        after_search_mode: Duration::ZERO,
        after_search: Duration::ZERO,
        after_select: Duration::ZERO,
    }
}

#[derive(Clone)]
pub(crate) struct Script {
    pub(crate) search_page: String,
    pub(crate) options: Vec<SelectOption>,
    pub(crate) results_page: String,
    pub(crate) fail_at: Option<usize>,
    pub(crate) panic_at: Option<usize>,
    pub(crate) fail_launch: bool,
}

impl Script {
    pub(crate) fn happy(options: Vec<SelectOption>) -> Self {
        Self {
            search_page: "<html><body><select name='ctl00$MainContent$lstAddresses'></select></body></html>"
                .to_owned(),
            options,
            results_page: RESULTS_PAGE.to_owned(),
            fail_at: None,
            panic_at: None,
            fail_launch: false,
        }
    }
}

#[derive(Default)]
struct Journal {
    calls: Mutex<Vec<String>>,
    terminations: AtomicUsize,
}

pub(crate) struct FakeLauncher {
    script: Script,
    journal: Arc<Journal>,
}

impl FakeLauncher {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            journal: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.journal.calls.lock().expect("journal lock").clone()
    }

    pub(crate) fn terminations(&self) -> usize {
        self.journal.terminations.load(Ordering::SeqCst)
    }
}

impl BrowserLauncher for FakeLauncher {
    fn launch(&self) -> Result<Box<dyn BrowserSession>, DriverError> {
        if self.script.fail_launch {
            return Err(DriverError::Launch("no chrome in test".to_owned()));
        }
        Ok(Box::new(FakeSession {
            script: self.script.clone(),
            journal: Arc::clone(&self.journal),
            documents_read: 0,
        }))
    }
}

struct FakeSession {
    script: Script,
    journal: Arc<Journal>,
    documents_read: usize,
}

impl FakeSession {
    fn record(&self, call: String) -> Result<(), DriverError> {
        let step = {
            let mut calls = self.journal.calls.lock().expect("journal lock");
            calls.push(call);
            calls.len() - 1
        };
        if self.script.panic_at == Some(step) {
            panic!("browser crashed at step {step}");
        }
        if self.script.fail_at == Some(step) {
            return Err(DriverError::Browser(anyhow!("injected failure at step {step}")));
        }
        Ok(())
    }
}

impl BrowserSession for FakeSession {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.record(format!("navigate {url}"))
    }

    fn wait_interactable(&mut self, locator: Locator, _timeout: Duration) -> Result<(), DriverError> {
        self.record(format!("wait {locator}"))
    }

    fn click(&mut self, locator: Locator) -> Result<(), DriverError> {
        self.record(format!("click {locator}"))
    }

    fn fill(&mut self, locator: Locator, text: &str) -> Result<(), DriverError> {
        self.record(format!("fill {locator} {text}"))
    }

    fn options(&mut self, locator: Locator) -> Result<Vec<SelectOption>, DriverError> {
        self.record(format!("options {locator}"))?;
        Ok(self.script.options.clone())
    }

    fn select_option(&mut self, locator: Locator, value: &str) -> Result<(), DriverError> {
        self.record(format!("select {locator} {value}"))?;
        if self.script.options.iter().any(|option| option.value == value) {
            Ok(())
        } else {
            Err(DriverError::OptionMissing {
                locator,
                value: value.to_owned(),
            })
        }
    }

    fn read_document(&mut self) -> Result<String, DriverError> {
        self.record("read".to_owned())?;
        self.documents_read += 1;
        if self.documents_read == 1 {
            Ok(self.script.search_page.clone())
        } else {
            Ok(self.script.results_page.clone())
        }
    }

    fn terminate(&mut self) {
        self.journal.terminations.fetch_add(1, Ordering::SeqCst);
    }
}
