//! Browser capability surface consumed by the render pipeline
//!
//! The pipeline only needs launch / new page / set content / idle wait /
//! selector wait / screenshot / close, so that surface is expressed as a
//! small trait family. The production adapter lives in [`crate::cdp`]; tests
//! inject scripted fakes to exercise failure and cleanup paths without a
//! browser.

use std::time::Duration;

use crate::{RenderConfig, Result};

/// Launches browser instances with a fixed configuration.
pub trait BrowserLauncher {
    type Browser: BrowserHandle;

    /// Launch a fresh browser instance. On failure there is nothing to
    /// release; the caller owns the returned handle exclusively.
    fn launch(&self, config: &RenderConfig) -> Result<Self::Browser>;
}

/// An exclusively owned browser instance.
pub trait BrowserHandle {
    type Page: PageHandle;

    /// Open a new page scoped to this browser instance.
    fn new_page(&self) -> Result<Self::Page>;

    /// Close the browser and terminate its process. Consumes the handle so
    /// release can only happen once.
    fn close(self) -> Result<()>;
}

/// A page within a browser instance.
pub trait PageHandle {
    type Element: ElementHandle;

    /// Replace the page's content with the given markup and wait for the
    /// initial parse, bounded by `timeout`.
    fn set_content(&self, html: &str, timeout: Duration) -> Result<()>;

    /// Wait until resource loading has settled: no pending loads for at
    /// least `settle`, bounded overall by `timeout`.
    fn wait_for_network_idle(&self, timeout: Duration, settle: Duration) -> Result<()>;

    /// Wait for an element matching `selector` to appear, bounded by
    /// `timeout`, and return a handle to it.
    fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<Self::Element>;
}

/// A resolved element that can be captured.
pub trait ElementHandle {
    /// Screenshot exactly this element as PNG bytes.
    fn screenshot(&self) -> Result<Vec<u8>>;
}
