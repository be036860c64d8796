//! Chrome DevTools Protocol backend
//!
//! Launches a Chrome/Chromium process through `chromiumoxide`, one process
//! and one throwaway profile per [`PageDriver`].

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::error::CdpError;
use chromiumoxide::layout::Point;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use super::dom::{self, ActionStatus, ProbeHit};
use super::{BrowserLauncher, ElementHandle, PageDriver};
use crate::common::config::{BrowserConfig, ImageFormat};
use crate::common::{Error, Result};
use crate::scenario::Locator;

/// Launches a fresh Chrome process per session
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    executable: PathBuf,
    config: BrowserConfig,
    request_timeout: Duration,
}

impl ChromeLauncher {
    /// `request_timeout` bounds individual CDP calls; it should be at least
    /// the navigation timeout so `goto` is limited by the executor instead.
    pub fn new(executable: PathBuf, config: BrowserConfig, request_timeout: Duration) -> Self {
        Self {
            executable,
            config,
            request_timeout,
        }
    }

    fn cdp_config(&self, profile: &TempDir) -> Result<CdpConfig> {
        let mut builder = CdpConfig::builder()
            .chrome_executable(&self.executable)
            .user_data_dir(profile.path())
            .window_size(self.config.window_width, self.config.window_height)
            .viewport(None)
            .request_timeout(self.request_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !self.config.headless {
            builder = builder.with_head();
        }
        for arg in &self.config.args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(Error::BrowserLaunch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn PageDriver>> {
        let profile = tempfile::Builder::new()
            .prefix("uiproof-profile-")
            .tempdir()
            .map_err(|e| Error::BrowserLaunch(format!("cannot create profile directory: {}", e)))?;

        tracing::info!(
            executable = %self.executable.display(),
            headless = self.config.headless,
            "Launching browser"
        );

        let config = self.cdp_config(&profile)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::BrowserLaunch(e.to_string()))?;

        // The handler drives the websocket; it must be polled for any CDP
        // call to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler: {}", e);
                }
            }
            tracing::debug!("CDP handler loop ended");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Do not leak the process when the first page cannot open
                let _ = browser.close().await;
                handler_task.abort();
                return Err(Error::BrowserLaunch(format!("cannot open page: {}", e)));
            }
        };

        Ok(Box::new(ChromePage {
            browser,
            page,
            handler_task,
            profile: Some(profile),
        }))
    }
}

/// One page in a launched Chrome process
pub struct ChromePage {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile: Option<TempDir>,
}

impl ChromePage {
    /// Evaluate one of the [`dom`] scripts and decode its JSON result
    async fn evaluate_json<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let raw: String = self
            .page
            .evaluate_expression(script)
            .await
            .map_err(cdp_error)?
            .into_value()
            .map_err(|e| Error::Browser(format!("unexpected script result: {}", e)))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn cdp_error(e: CdpError) -> Error {
    Error::Browser(e.to_string())
}

fn refused(element: &ElementHandle, status: &ActionStatus) -> Error {
    Error::interaction(format!("<{}> {}", element.tag, element.id), status.reason())
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()> {
        tracing::debug!(url, "CDP Page.navigate");
        match self.page.goto(url).await {
            Ok(_) => Ok(()),
            Err(CdpError::Timeout) => Err(Error::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
            Err(e) => Err(Error::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn probe(&mut self, locator: &Locator) -> Result<Option<ElementHandle>> {
        let hit: Option<ProbeHit> = self.evaluate_json(dom::probe(locator)?).await?;
        Ok(hit.map(|h| ElementHandle { id: h.id, tag: h.tag }))
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<()> {
        let status: ActionStatus = self.evaluate_json(dom::actionable(&element.id)?).await?;
        if !status.is_ok() {
            return Err(refused(element, &status));
        }
        let (Some(x), Some(y)) = (status.x, status.y) else {
            return Err(Error::Browser("actionable check returned no coordinates".into()));
        };

        tracing::debug!(id = %element.id, x, y, "CDP Input.dispatchMouseEvent");
        self.page
            .click(Point { x, y })
            .await
            .map_err(|e| Error::interaction(&element.id, e.to_string()))?;
        Ok(())
    }

    async fn fill(&mut self, element: &ElementHandle, value: &str) -> Result<()> {
        let status: ActionStatus = self.evaluate_json(dom::fill(&element.id, value)?).await?;
        if status.is_ok() {
            Ok(())
        } else {
            Err(refused(element, &status))
        }
    }

    async fn screenshot(&mut self, format: ImageFormat) -> Result<Vec<u8>> {
        let format = match format {
            ImageFormat::Png => CaptureScreenshotFormat::Png,
            ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
        };
        self.page
            .screenshot(
                ScreenshotParams::builder()
                    .format(format)
                    .full_page(false)
                    .build(),
            )
            .await
            .map_err(cdp_error)
    }

    async fn close(&mut self) -> Result<()> {
        let result = self.browser.close().await.map(|_| ()).map_err(cdp_error);
        if result.is_ok() {
            // Reap the process so the profile is no longer in use
            let _ = self.browser.wait().await;
        }
        self.handler_task.abort();

        if let Some(profile) = self.profile.take() {
            if let Err(e) = profile.close() {
                tracing::warn!("Failed to remove browser profile: {}", e);
            }
        }
        result
    }

    fn abort(&mut self) {
        self.handler_task.abort();
        // The profile directory goes with it; the process is killed when
        // `Browser` is dropped
        self.profile.take();
    }
}
