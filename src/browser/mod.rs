//! Browser driver seam
//!
//! The engine never talks to a browser directly. It launches one through a
//! [`BrowserLauncher`] and drives the resulting page through [`PageDriver`].
//! The production backend speaks the Chrome DevTools Protocol
//! ([`chrome::ChromeLauncher`]); tests plug in an in-memory page.

pub mod chrome;
pub mod detect;
mod dom;

use std::time::Duration;

use async_trait::async_trait;

use crate::common::config::ImageFormat;
use crate::common::Result;
use crate::scenario::Locator;

/// Opaque reference to an element found by [`PageDriver::probe`]
///
/// Only meaningful for the page that produced it, and only until the next
/// re-render: a stale handle makes `click`/`fill` fail with an interaction
/// error rather than act on a different node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Driver-specific identifier
    pub id: String,
    /// Lower-case tag name, for diagnostics
    pub tag: String,
}

/// Starts a browser process with a single blank page
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a new, isolated browser instance
    async fn launch(&self) -> Result<Box<dyn PageDriver>>;
}

/// One live page inside a launched browser
#[async_trait]
pub trait PageDriver: Send {
    /// Load `url`; returns once the navigation has committed.
    ///
    /// Implementations may block past `timeout`; the executor enforces it.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Look for the first visible element matching `locator`, without waiting
    async fn probe(&mut self, locator: &Locator) -> Result<Option<ElementHandle>>;

    /// Click a resolved element
    async fn click(&mut self, element: &ElementHandle) -> Result<()>;

    /// Replace the value of a resolved text-entry control
    async fn fill(&mut self, element: &ElementHandle, value: &str) -> Result<()>;

    /// Capture the current viewport
    async fn screenshot(&mut self, format: ImageFormat) -> Result<Vec<u8>>;

    /// Close the page and shut the browser down
    async fn close(&mut self) -> Result<()>;

    /// Synchronous last-resort teardown, used when a session is dropped
    /// without being released
    fn abort(&mut self) {}
}
