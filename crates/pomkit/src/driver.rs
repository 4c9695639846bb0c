//! Browser automation driver abstraction.
//!
//! Page objects never talk to a browser directly: they go through
//! [`PageActions`](crate::PageActions), which consumes this capability set.
//! [`MockBrowser`](crate::mock::MockBrowser) implements it in memory and
//! `ChromiumDriver` (feature `browser`) implements it over CDP.

use crate::dialog::{Dialog, DialogPolicy};
use crate::locator::Locator;
use crate::result::PomResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Element bounding box in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the box has a visible area
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Point-in-time view of one matched element.
///
/// Snapshots are returned by value; nothing in the core keeps them across
/// actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag: String,
    /// Rendered text content
    pub text: String,
    /// Current value for form controls
    pub value: Option<String>,
    /// Rendered and not hidden
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Checked state for checkboxes
    pub checked: Option<bool>,
    /// Layout box, if rendered
    pub bounds: Option<BoundingBox>,
}

/// Mouse click variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickKind {
    /// Single left click
    #[default]
    Single,
    /// Double left click
    Double,
    /// Right (context-menu) click
    Right,
}

impl std::fmt::Display for ClickKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "click"),
            Self::Double => write!(f, "double_click"),
            Self::Right => write!(f, "right_click"),
        }
    }
}

/// Document readiness a navigation waits for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    /// `load` event fired
    Load,
    /// `DOMContentLoaded` fired
    #[default]
    DomContentLoaded,
    /// No network activity for a short quiet period
    NetworkIdle,
}

impl LoadState {
    /// Name of the lifecycle event this state waits for
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkIdle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Chromium sandbox
    pub sandbox: bool,
    /// Delay inserted after every action
    pub slow_mo: Duration,
    /// Executable path override
    pub executable_path: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            sandbox: true,
            slow_mo: Duration::ZERO,
            executable_path: None,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Disable the Chromium sandbox (needed in most containers)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Delay every action by `delay`
    #[must_use]
    pub const fn slow_mo(mut self, delay: Duration) -> Self {
        self.slow_mo = delay;
        self
    }

    /// Use a specific browser executable
    #[must_use]
    pub fn executable(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }
}

/// Capability set the page-object layer consumes.
///
/// One driver instance is one isolated browsing context. Implementations do
/// no waiting of their own beyond `navigate`; actionability polling lives in
/// [`PageActions`](crate::PageActions).
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load `url` and wait for `state`, failing after `timeout`
    async fn navigate(&self, url: &str, state: LoadState, timeout: Duration) -> PomResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> PomResult<String>;

    /// Resolve a locator against the live document
    async fn query(&self, locator: &Locator) -> PomResult<Vec<ElementSnapshot>>;

    /// Click the first element the locator resolves to
    async fn click(&self, locator: &Locator, kind: ClickKind) -> PomResult<()>;

    /// Replace the value of the first matched form control
    async fn fill(&self, locator: &Locator, text: &str) -> PomResult<()>;

    /// Set the checked state of the first matched checkbox
    async fn set_checked(&self, locator: &Locator, checked: bool) -> PomResult<()>;

    /// Capture a PNG screenshot
    async fn screenshot(&self, full_page: bool) -> PomResult<Vec<u8>>;

    /// Choose how dialogs opened from now on are answered
    async fn set_dialog_policy(&self, policy: DialogPolicy) -> PomResult<()>;

    /// Remove and return dialogs observed since the last call
    async fn take_dialogs(&self) -> PomResult<Vec<Dialog>>;

    /// Close the browsing context
    async fn close(&self) -> PomResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_area() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 5.0).has_area());
        assert!(!BoundingBox::new(3.0, 3.0, 0.0, 5.0).has_area());
    }

    #[test]
    fn test_config_builder() {
        let config = DriverConfig::new()
            .headless(false)
            .viewport(800, 600)
            .no_sandbox()
            .slow_mo(Duration::from_millis(100))
            .executable("/usr/bin/chromium");
        assert!(!config.headless);
        assert_eq!(config.viewport_width, 800);
        assert!(!config.sandbox);
        assert_eq!(config.slow_mo, Duration::from_millis(100));
        assert_eq!(config.executable_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[test]
    fn test_click_kind_names() {
        assert_eq!(ClickKind::Single.to_string(), "click");
        assert_eq!(ClickKind::Double.to_string(), "double_click");
        assert_eq!(ClickKind::Right.to_string(), "right_click");
    }
}
