//! Minimal browser capability the scrape sequence is written against.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use serde::Deserialize;

/// How an element on the council form is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Element `id` attribute.
    Id(&'static str),
    /// Form field `name` attribute.
    Name(&'static str),
}

impl Locator {
    /// CSS selector matching the element.
    #[must_use]
    pub fn css(self) -> String {
        match self {
            Locator::Id(id) => format!("#{id}"),
            Locator::Name(name) => format!("[name=\"{name}\"]"),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(formatter, "id={id}"),
            Locator::Name(name) => write!(formatter, "name={name}"),
        }
    }
}

/// One `<option>` of a `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Visible label.
    pub text: String,
}

impl SelectOption {
    /// Construct an option from its value and label.
    #[must_use]
    pub fn new<V: Into<String>, T: Into<String>>(value: V, text: T) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
/// Failures raised by a browser driver.
pub enum DriverError {
    /// The browser process could not be started.
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    /// An element did not become interactable in time.
    #[error("Timed out after {waited:?} waiting for {locator}: {reason}")]
    Timeout {
        /// Element that was awaited.
        locator: Locator,
        /// Time spent waiting.
        waited: Duration,
        /// Last reason the element was not ready.
        reason: String,
    },
    /// A `<select>` has no option with the requested value.
    #[error("No option with value {value:?} in {locator}")]
    OptionMissing {
        /// The select element.
        locator: Locator,
        /// Value that was requested.
        value: String,
    },
    /// Any other error reported by the automation library.
    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),
}

/// A live browser instance driven step by step.
///
/// Every call blocks until the browser answers.
pub trait BrowserSession: Send {
    /// Load `url` and wait for the navigation to finish.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when navigation fails.
    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Wait until the element exists, is visible, and is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Timeout`] when `timeout` elapses first.
    fn wait_interactable(&mut self, locator: Locator, timeout: Duration) -> Result<(), DriverError>;

    /// Click the element.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the element is missing or the click fails.
    fn click(&mut self, locator: Locator) -> Result<(), DriverError>;

    /// Clear the input, then type `text` into it.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the element is missing or typing fails.
    fn fill(&mut self, locator: Locator, text: &str) -> Result<(), DriverError>;

    /// Options of a `<select>` element, in document order.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the element is missing or unreadable.
    fn options(&mut self, locator: Locator) -> Result<Vec<SelectOption>, DriverError>;

    /// Select the option carrying `value`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::OptionMissing`] when no option has that value.
    fn select_option(&mut self, locator: Locator, value: &str) -> Result<(), DriverError>;

    /// Serialized HTML of the current page.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the page cannot be read.
    fn read_document(&mut self) -> Result<String, DriverError>;

    /// Shut the browser down.
    fn terminate(&mut self);
}

/// Factory for browser sessions.
pub trait BrowserLauncher: Send + Sync {
    /// Start a fresh browser.
    ///
    /// # Errors
    ///
    /// Returns a [`DriverError`] when the browser cannot be started.
    fn launch(&self) -> Result<Box<dyn BrowserSession>, DriverError>;
}

/// Owns a session and terminates it exactly once.
///
/// Termination happens on [`SessionGuard::release`] or, failing that, on drop,
/// which also covers unwinding.
pub struct SessionGuard {
    session: Box<dyn BrowserSession>,
    terminated: bool,
}

impl SessionGuard {
    /// Take ownership of a freshly launched session.
    #[must_use]
    pub fn new(session: Box<dyn BrowserSession>) -> Self {
        Self {
            session,
            terminated: false,
        }
    }

    /// Terminate the session now.
    pub fn release(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.terminated {
            self.terminated = true;
            self.session.terminate();
        }
    }
}

impl Deref for SessionGuard {
    type Target = dyn BrowserSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
