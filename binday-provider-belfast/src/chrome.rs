//! Headless Chrome backend for [`BrowserSession`].

use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::browser::{BrowserLauncher, BrowserSession, DriverError, Locator, SelectOption};

/// Environment variable naming the Chrome binary.
pub const CHROME_BIN_ENV: &str = "CHROME_BIN";
/// Binary used when [`CHROME_BIN_ENV`] is unset.
pub const DEFAULT_CHROME_BIN: &str = "/usr/bin/google-chrome";

const WINDOW_SIZE: (u32, u32) = (1920, 1080);
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// --headless and --no-sandbox come from the launch options.
static CHROME_ARGS: [&str; 6] = [
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-software-rasterizer",
    "--disable-extensions",
    "--disable-setuid-sandbox",
    "--user-agent=Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const INTERACTABLE_JS: &str =
    "function() { return !this.disabled && this.getClientRects().length > 0; }";
const CLEAR_JS: &str = "function() { this.value = ''; }";
const OPTIONS_JS: &str = "function() { return JSON.stringify(Array.from(this.options, (option) => ({ value: option.value, text: option.text }))); }";
const SELECT_JS: &str = "function(value) { this.value = value; this.dispatchEvent(new Event('change', { bubbles: true })); return this.value === value; }";

/// Launch settings for the Chrome process.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Preferred binary. Checked on every launch; autodetection takes over while it is missing.
    pub binary: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_CHROME_BIN),
        }
    }
}

impl BrowserConfig {
    /// Read the binary location from [`CHROME_BIN_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        env::var_os(CHROME_BIN_ENV).map_or_else(Self::default, |binary| Self {
            binary: binary.into(),
        })
    }

    /// The configured binary if it exists right now, otherwise `None` for autodetection.
    #[must_use]
    pub fn resolve_binary(&self) -> Option<PathBuf> {
        if self.binary.exists() {
            Some(self.binary.clone())
        } else {
            debug!(
                path = %self.binary.display(),
                "Chrome binary not found, relying on autodetection"
            );
            None
        }
    }
}

/// Starts one headless Chrome per session.
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    /// Create a launcher with the given configuration.
    #[must_use]
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl BrowserLauncher for ChromeLauncher {
    fn launch(&self) -> Result<Box<dyn BrowserSession>, DriverError> {
        let binary = self.config.resolve_binary();
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some(WINDOW_SIZE))
            .path(binary.clone())
            .idle_browser_timeout(IDLE_TIMEOUT)
            .args(CHROME_ARGS.iter().map(|arg| OsStr::new(*arg)).collect())
            .build()
            .map_err(|err| DriverError::Launch(err.to_string()))?;

        let browser = Browser::new(options).map_err(|err| DriverError::Launch(err.to_string()))?;
        let tab = browser.new_tab()?;
        info!(
            binary = ?binary,
            "Browser session started"
        );

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            tab,
        }))
    }
}

struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeSession {
    fn element(&self, locator: Locator) -> Result<Element<'_>, DriverError> {
        Ok(self.tab.find_element(&locator.css())?)
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(())
    }

    fn wait_interactable(&mut self, locator: Locator, timeout: Duration) -> Result<(), DriverError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let css = locator.css();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let reason = match self.tab.wait_for_element_with_custom_timeout(&css, remaining) {
                // The element may be swapped out by a postback between lookup and check.
                Ok(element) => match element.call_js_fn(INTERACTABLE_JS, Vec::new(), false) {
                    Ok(object) if object.value.as_ref().and_then(Value::as_bool) == Some(true) => {
                        return Ok(());
                    }
                    Ok(_) => "element is hidden or disabled".to_owned(),
                    Err(err) => err.to_string(),
                },
                Err(err) => err.to_string(),
            };

            if Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    locator,
                    waited: started.elapsed(),
                    reason,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn click(&mut self, locator: Locator) -> Result<(), DriverError> {
        self.element(locator)?.click()?;
        Ok(())
    }

    fn fill(&mut self, locator: Locator, text: &str) -> Result<(), DriverError> {
        let element = self.element(locator)?;
        element.call_js_fn(CLEAR_JS, Vec::new(), false)?;
        element.type_into(text)?;
        Ok(())
    }

    fn options(&mut self, locator: Locator) -> Result<Vec<SelectOption>, DriverError> {
        let raw = self
            .element(locator)?
            .call_js_fn(OPTIONS_JS, Vec::new(), false)?
            .value;

        decode_options(raw)
    }

    fn select_option(&mut self, locator: Locator, value: &str) -> Result<(), DriverError> {
        let selected = self
            .element(locator)?
            .call_js_fn(SELECT_JS, vec![json!(value)], false)?
            .value
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if selected {
            Ok(())
        } else {
            Err(DriverError::OptionMissing {
                locator,
                value: value.to_owned(),
            })
        }
    }

    fn read_document(&mut self) -> Result<String, DriverError> {
        Ok(self.tab.get_content()?)
    }

    fn terminate(&mut self) {
        // Dropping the browser kills the Chrome process.
        if self.browser.take().is_some() {
            info!("Browser session terminated");
        }
    }
}

fn decode_options(raw: Option<Value>) -> Result<Vec<SelectOption>, DriverError> {
    let Some(Value::String(json)) = raw else {
        return Err(DriverError::Browser(anyhow!(
            "option list script returned {raw:?} instead of a JSON string"
        )));
    };
    serde_json::from_str(&json).map_err(|err| DriverError::Browser(err.into()))
}
