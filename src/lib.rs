//! chatshot
//!
//! Renders a chat transcript into a themed PNG image. A message list is laid
//! out as a self-contained HTML document (macOS-style window chrome, avatar
//! circles, rounded message bubbles) and materialized by screenshotting the
//! document's container element in headless Chrome.
//!
//! # Example
//!
//! ```no_run
//! use chatshot::{Message, RenderConfig, RenderRequest, Renderer, Theme};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = RenderRequest {
//!     messages: vec![Message {
//!         nickname: "Alice".to_string(),
//!         avatar: None,
//!         content: "Hi".to_string(),
//!     }],
//!     theme: Theme::Light,
//!     width: 1200,
//! };
//!
//! let renderer = Renderer::new(RenderConfig::default());
//! let png = renderer.render(&request)?;
//! std::fs::write("chat.png", png)?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod browser;
pub mod cdp;
pub mod document;
pub mod pipeline;

pub use cdp::CdpLauncher;
pub use pipeline::{render_image, Renderer};

/// Final image width used when the caller supplies none (device pixels).
pub const DEFAULT_WIDTH: u32 = 1600;

/// Configuration for the render pipeline
///
/// Every suspension point in the pipeline is individually bounded: content
/// load, network-idle polling, and the container-element wait each carry
/// their own timeout. The defaults are generous enough for webfont and
/// avatar fetches over slow links while still guaranteeing termination.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Browser viewport dimensions
    pub viewport: Viewport,
    /// Timeout for the initial content load/parse in milliseconds
    pub content_load_timeout_ms: u64,
    /// Timeout for the network-idle wait in milliseconds
    pub network_idle_timeout_ms: u64,
    /// Settling window the page must stay quiet for before it counts as idle
    pub network_idle_settle_ms: u64,
    /// Timeout for locating the container element in milliseconds
    pub selector_timeout_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            content_load_timeout_ms: 30000,
            network_idle_timeout_ms: 10000,
            network_idle_settle_ms: 500,
            selector_timeout_ms: 5000,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// One chat entry supplied by the caller
///
/// Constructed from caller JSON for the duration of one render call. The
/// text fields are untrusted and are escaped by the document builder;
/// `avatar` is validated as a URL before it reaches the markup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    /// Display name shown above the bubble
    pub nickname: String,
    /// Optional avatar image URL; absent means "no avatar"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Message body
    pub content: String,
}

/// Color theme for the rendered transcript
///
/// Only the exact string `"dark"` selects the dark palette; every other
/// value (including `"DARK"`, `""`, or a missing parameter) is light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// The theme's color triple
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                text: "white",
                bubble: "#0a061a",
                background: "#221f33",
            },
            Theme::Light => Palette {
                text: "black",
                bubble: "#fdfcff",
                background: "#f2f0fa",
            },
        }
    }
}

/// Theme-dependent colors: body text, message bubble, page background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub bubble: &'static str,
    pub background: &'static str,
}

/// The validated input of one render invocation
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Transcript in display order
    pub messages: Vec<Message>,
    pub theme: Theme,
    /// Final intended image width in device pixels
    pub width: u32,
}

impl RenderRequest {
    /// Build a request from the string-encoded caller boundary.
    ///
    /// `messages` must be a JSON array of message objects; a parse failure
    /// is rejected as [`Error::Input`] rather than degrading to an empty
    /// transcript. `theme` and `width` are lenient: unknown themes map to
    /// light, and a missing or non-numeric width falls back to
    /// [`DEFAULT_WIDTH`].
    pub fn from_query(
        messages: &str,
        theme: Option<&str>,
        width: Option<&str>,
    ) -> Result<Self> {
        let messages: Vec<Message> = serde_json::from_str(messages)
            .map_err(|e| Error::Input(format!("malformed messages JSON: {}", e)))?;

        let theme = Theme::parse(theme.unwrap_or(""));

        let width = width
            .and_then(|w| w.trim().parse::<u32>().ok())
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_WIDTH);

        Ok(Self {
            messages,
            theme,
            width,
        })
    }
}
