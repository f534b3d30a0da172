//! Chrome DevTools Protocol adapter (uses the `headless_chrome` crate)
//!
//! Implements the browser capability traits over a real headless Chrome
//! process. Content is loaded through a base64 data URL so no local HTTP
//! server is needed, and the network-idle wait polls the page for resource
//! completion since CDP exposes no single "idle" signal.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;

use crate::browser::{BrowserHandle, BrowserLauncher, ElementHandle, PageHandle};
use crate::{Error, RenderConfig, Result};

/// Poll interval for the network-idle probe
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Page-side probe for "all visual resources loaded": every image element
/// has finished (successfully or not) and the font faces are ready.
const IDLE_PROBE: &str = r#"
(function() {
    const imgs = document.images;
    for (let i = 0; i < imgs.length; i++) {
        if (!imgs[i].complete) return false;
    }
    return document.fonts ? document.fonts.status === 'loaded' : true;
})()
"#;

/// Launches headless Chrome instances
///
/// Web security is disabled so the data-URL document may load cross-origin
/// webfonts and avatars, and certificate errors on avatar hosts are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdpLauncher;

/// An exclusively owned Chrome process
pub struct CdpBrowser {
    browser: Browser,
}

/// A tab within a [`CdpBrowser`]
pub struct CdpPage {
    tab: Arc<Tab>,
}

/// A located element, re-resolved by selector at capture time
pub struct CdpElement {
    tab: Arc<Tab>,
    selector: String,
}

impl BrowserLauncher for CdpLauncher {
    type Browser = CdpBrowser;

    fn launch(&self, config: &RenderConfig) -> Result<CdpBrowser> {
        let args: Vec<&OsStr> = vec![OsStr::new("--disable-web-security")];

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .ignore_certificate_errors(true)
            .args(args)
            .build()
            .map_err(|e| {
                Error::BrowserAcquisition(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::BrowserAcquisition(format!("Failed to launch browser: {}", e)))?;

        debug!("launched headless browser");
        Ok(CdpBrowser { browser })
    }
}

impl BrowserHandle for CdpBrowser {
    type Page = CdpPage;

    fn new_page(&self) -> Result<CdpPage> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| Error::Render(format!("Failed to create tab: {}", e)))?;
        Ok(CdpPage { tab })
    }

    fn close(self) -> Result<()> {
        // Dropping the Browser terminates the child process promptly.
        drop(self.browser);
        Ok(())
    }
}

impl CdpPage {
    fn resources_settled(&self) -> Result<bool> {
        let eval = self
            .tab
            .evaluate(IDLE_PROBE, false)
            .map_err(|e| Error::Render(format!("Idle probe failed: {}", e)))?;
        Ok(eval.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl PageHandle for CdpPage {
    type Element = CdpElement;

    fn set_content(&self, html: &str, timeout: Duration) -> Result<()> {
        // Navigating to a data URL assigns the document in one step and
        // gives us the regular load-event synchronization.
        let encoded = base64::engine::general_purpose::STANDARD.encode(html);
        let url = format!("data:text/html;base64,{}", encoded);

        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(&url)
            .map_err(|e| Error::Render(format!("Content load failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Render(format!("Wait for content load failed: {}", e)))?;

        debug!("document loaded ({} bytes of markup)", html.len());
        Ok(())
    }

    fn wait_for_network_idle(&self, timeout: Duration, settle: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.resources_settled()? {
                // Require the page to stay settled across the settling
                // window before declaring idle.
                std::thread::sleep(settle);
                if self.resources_settled()? {
                    debug!("network idle");
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(timeout.as_millis() as u64));
            }
            std::thread::sleep(IDLE_POLL);
        }
    }

    fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<CdpElement> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_| Error::Timeout(timeout.as_millis() as u64))?;

        Ok(CdpElement {
            tab: Arc::clone(&self.tab),
            selector: selector.to_string(),
        })
    }
}

impl ElementHandle for CdpElement {
    fn screenshot(&self) -> Result<Vec<u8>> {
        let element = self
            .tab
            .find_element(&self.selector)
            .map_err(|e| Error::Capture(format!("Element vanished before capture: {}", e)))?;

        element
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png)
            .map_err(|e| Error::Capture(format!("Screenshot failed: {}", e)))
    }
}
