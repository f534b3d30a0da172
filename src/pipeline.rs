//! Render pipeline: HTML document → PNG bytes
//!
//! Orchestrates one browser instance per invocation: acquire, open a page,
//! load the built document, wait for resources to settle, locate the
//! container element, screenshot it, and release the browser. Release runs
//! on every exit path once acquisition has succeeded; stage errors propagate
//! to the caller after cleanup, untouched.

use std::time::Duration;

use log::{debug, warn};

use crate::browser::{BrowserHandle, BrowserLauncher, ElementHandle, PageHandle};
use crate::cdp::CdpLauncher;
use crate::document::{self, CONTAINER_SELECTOR};
use crate::{Error, RenderConfig, RenderRequest, Result};

/// Renders transcripts through a browser launcher.
///
/// Each [`render`](Renderer::render) call launches a fresh browser instance,
/// owns it exclusively, and closes it before returning. Invocations share no
/// state, so a `Renderer` may be used from any number of callers.
pub struct Renderer<L: BrowserLauncher = CdpLauncher> {
    launcher: L,
    config: RenderConfig,
}

impl Renderer<CdpLauncher> {
    /// A renderer backed by headless Chrome.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_launcher(CdpLauncher, config)
    }
}

impl<L: BrowserLauncher> Renderer<L> {
    /// A renderer over an arbitrary launcher, used to inject fakes in tests.
    pub fn with_launcher(launcher: L, config: RenderConfig) -> Self {
        Self { launcher, config }
    }

    /// Render a transcript to PNG bytes.
    ///
    /// Either a complete image is returned or an error; there is no partial
    /// output and no internal retry.
    pub fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let html = document::build(&request.messages, request.theme, request.width);

        let browser = self.launcher.launch(&self.config)?;
        let result = self.capture(&browser, &html);

        // Release runs before any stage error propagates. A close failure
        // after a successful capture is logged, not fatal: the image is
        // already complete.
        if let Err(e) = browser.close() {
            warn!("browser close failed: {}", e);
        }

        result
    }

    fn capture(&self, browser: &L::Browser, html: &str) -> Result<Vec<u8>> {
        let page = browser.new_page()?;

        page.set_content(html, Duration::from_millis(self.config.content_load_timeout_ms))?;
        page.wait_for_network_idle(
            Duration::from_millis(self.config.network_idle_timeout_ms),
            Duration::from_millis(self.config.network_idle_settle_ms),
        )?;

        let container = page.wait_for_selector(
            CONTAINER_SELECTOR,
            Duration::from_millis(self.config.selector_timeout_ms),
        )?;

        let bytes = container.screenshot()?;
        debug!("captured {} byte screenshot", bytes.len());
        Ok(bytes)
    }
}

/// Async facade over the synchronous pipeline.
///
/// Runs the render on a blocking worker so async callers can await it
/// without stalling the runtime.
pub async fn render_image(request: RenderRequest, config: RenderConfig) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || Renderer::new(config).render(&request))
        .await
        .map_err(|e| Error::Other(format!("render worker failed: {}", e)))?
}
