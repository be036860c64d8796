//! Browser session lifecycle
//!
//! A [`Session`] owns one browser process and one page for the duration of a
//! single scenario run. It moves `Uninitialized -> Open -> Closed` and is
//! closed exactly once, however the run ends.

use std::sync::Arc;

use crate::browser::{BrowserLauncher, PageDriver};
use crate::common::{Error, Result};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No browser launched yet
    Uninitialized,
    /// Browser running, page available
    Open,
    /// Browser shut down; terminal
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// One browser process plus one page, exclusively owned by a run
pub struct Session {
    state: SessionState,
    driver: Option<Box<dyn PageDriver>>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            driver: None,
        }
    }

    async fn open(&mut self, launcher: &dyn BrowserLauncher) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(Error::Internal(format!(
                "cannot open a session that is {}",
                self.state
            )));
        }
        let driver = launcher.launch().await?;
        self.driver = Some(driver);
        self.state = SessionState::Open;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The live page; fails unless the session is open
    pub fn page(&mut self) -> Result<&mut dyn PageDriver> {
        match (self.state, self.driver.as_mut()) {
            (SessionState::Open, Some(driver)) => Ok(driver.as_mut()),
            (state, _) => Err(Error::SessionNotOpen(state.to_string())),
        }
    }

    /// Close the page and the browser.
    ///
    /// Moves to `Closed` even when the driver reports an error. Calling it
    /// again is a no-op.
    pub async fn release(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;

        let Some(mut driver) = self.driver.take() else {
            return Ok(());
        };
        tracing::debug!("Releasing browser session");
        let result = driver.close().await;
        if let Err(e) = &result {
            tracing::warn!("Browser did not shut down cleanly: {}", e);
            driver.abort();
        }
        result
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            tracing::warn!("Browser session dropped while {}; aborting", self.state);
            driver.abort();
        }
    }
}

/// Hands out sessions backed by a [`BrowserLauncher`]
#[derive(Clone)]
pub struct SessionManager {
    launcher: Arc<dyn BrowserLauncher>,
}

impl SessionManager {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self { launcher }
    }

    /// Launch a browser and open one page.
    ///
    /// A launch failure is fatal for the run and is not retried.
    pub async fn acquire(&self) -> Result<Session> {
        let mut session = Session::new();
        session.open(self.launcher.as_ref()).await?;
        tracing::debug!("Browser session open");
        Ok(session)
    }

    /// Explicit form of [`Session::release`]
    pub async fn release(&self, session: &mut Session) -> Result<()> {
        session.release().await
    }
}
