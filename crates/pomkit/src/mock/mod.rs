//! In-memory browser for unit testing page objects.
//!
//! [`MockBrowser`] implements [`BrowserDriver`] over a [`MockDom`]. Routes map
//! a URL to a function that renders the document; event handlers map a
//! selector to a function that mutates it. Every driver call is recorded so
//! tests can check what a page object did.
//!
//! ## Example
//!
//! ```rust,ignore
//! let buy = Locator::css("#buy");
//! let browser = MockBrowser::new().route("https://shop.test/", {
//!     let buy = buy.clone();
//!     move |dom| dom.add(MockElement::new("button").answering(&buy).text("Buy"))
//! });
//! browser.on_click(&buy, |dom| dom.raise_alert("Thanks"));
//! ```

mod dom;
pub mod sites;

pub use dom::{MockDom, MockElement};

use crate::dialog::{Dialog, DialogPolicy, DialogRecorder};
use crate::driver::{BrowserDriver, ClickKind, ElementSnapshot, LoadState};
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Renders a document for a route
pub type RouteFn = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// Mutates the document in response to an event
pub type HandlerFn = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// Bytes returned by [`MockBrowser::screenshot`]: a PNG signature and a tag
pub const MOCK_PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

#[derive(Default)]
struct BrowserState {
    routes: Vec<(String, RouteFn)>,
    handlers: HashMap<(ClickKind, String), Vec<HandlerFn>>,
    dom: MockDom,
    history: Vec<String>,
    closed: bool,
    fail_screenshots: bool,
}

fn normalize(url: &str) -> &str {
    url.trim_end_matches('/')
}

impl BrowserState {
    fn ensure_open(&self) -> PomResult<()> {
        if self.closed {
            Err(PomError::driver("browsing context is closed"))
        } else {
            Ok(())
        }
    }

    fn route_for(&self, url: &str) -> Option<RouteFn> {
        let wanted = normalize(url);
        let path_only = wanted.split(['?', '#']).next().unwrap_or(wanted);
        self.routes
            .iter()
            .find(|(route, _)| normalize(route) == wanted)
            .or_else(|| {
                self.routes
                    .iter()
                    .find(|(route, _)| normalize(route) == path_only)
            })
            .map(|(_, render)| Arc::clone(render))
    }

    fn load(&mut self, url: &str) -> bool {
        let Some(render) = self.route_for(url) else {
            return false;
        };
        self.dom.reset(url);
        render(&mut self.dom);
        true
    }

    /// Run handlers for the element at `index`, then apply any redirect.
    fn fire(&mut self, kind: ClickKind, index: usize, dialogs: &DialogRecorder) {
        let keys: Vec<String> = self
            .dom
            .element(index)
            .map(|e| e.keys().to_vec())
            .unwrap_or_default();
        let handlers: Vec<HandlerFn> = keys
            .into_iter()
            .filter_map(|key| self.handlers.get(&(kind, key)))
            .flatten()
            .cloned()
            .collect();
        for handler in handlers {
            handler(&mut self.dom);
        }
        for dialog in self.dom.take_raised() {
            let _ = dialogs.handle(dialog);
        }
        if let Some(url) = self.dom.take_redirect() {
            self.history.push(format!("redirect:{url}"));
            let _ = self.load(&url);
        }
    }
}

/// Mock browser for unit testing
///
/// Clones share the same document, routes and history.
#[derive(Clone, Default)]
pub struct MockBrowser {
    state: Arc<Mutex<BrowserState>>,
    dialogs: DialogRecorder,
}

impl std::fmt::Debug for MockBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MockBrowser")
            .field("url", &state.dom.url())
            .field("routes", &state.routes.len())
            .field("calls", &state.history.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl MockBrowser {
    /// Create a browser with no routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register a page rendered by `render` at `url`
    #[must_use]
    pub fn route<F>(self, url: impl Into<String>, render: F) -> Self
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.lock().routes.push((url.into(), Arc::new(render)));
        self
    }

    /// Run `handler` when an element answering `locator` is clicked
    pub fn on_click<F>(&self, locator: &Locator, handler: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.on(ClickKind::Single, locator, handler);
    }

    /// Run `handler` on a specific kind of click
    pub fn on<F>(&self, kind: ClickKind, locator: &Locator, handler: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        self.lock()
            .handlers
            .entry((kind, locator.selector().key()))
            .or_default()
            .push(Arc::new(handler));
    }

    /// Make every later screenshot fail
    pub fn fail_screenshots(&self) {
        self.lock().fail_screenshots = true;
    }

    /// Inspect or mutate the live document
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        f(&mut self.lock().dom)
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Check if a call starting with `call` was recorded
    #[must_use]
    pub fn was_called(&self, call: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(call))
    }

    /// Whether `close` has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn first_index(state: &BrowserState, locator: &Locator, operation: &str) -> PomResult<usize> {
        state
            .dom
            .resolve(locator)
            .first()
            .copied()
            .ok_or_else(|| PomError::NotFound {
                operation: operation.to_string(),
                locator: locator.description(),
            })
    }
}

#[async_trait]
impl BrowserDriver for MockBrowser {
    async fn navigate(&self, url: &str, _state: LoadState, timeout: Duration) -> PomResult<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.history.push(format!("navigate:{url}"));
        if state.load(url) {
            Ok(())
        } else {
            Err(PomError::Navigation {
                url: url.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                message: "no route".to_string(),
            })
        }
    }

    async fn current_url(&self) -> PomResult<String> {
        let state = self.lock();
        state.ensure_open()?;
        Ok(state.dom.url().to_string())
    }

    async fn query(&self, locator: &Locator) -> PomResult<Vec<ElementSnapshot>> {
        let state = self.lock();
        state.ensure_open()?;
        Ok(state.dom.query(locator))
    }

    async fn click(&self, locator: &Locator, kind: ClickKind) -> PomResult<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        let index = Self::first_index(&state, locator, &kind.to_string())?;
        state.history.push(format!("{kind}:{locator}"));
        state.fire(kind, index, &self.dialogs);
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> PomResult<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        let index = Self::first_index(&state, locator, "fill")?;
        state.history.push(format!("fill:{locator}"));
        if state.dom.set_value(index, text) {
            Ok(())
        } else {
            Err(PomError::driver(format!(
                "{} is not a form control",
                locator.description()
            )))
        }
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> PomResult<()> {
        let mut state = self.lock();
        state.ensure_open()?;
        let index = Self::first_index(&state, locator, "check")?;
        state.history.push(format!("set_checked:{locator}"));
        let current = state.dom.element(index).and_then(|e| e.snapshot(tokio::time::Instant::now()).checked);
        if current.is_none() {
            return Err(PomError::driver(format!(
                "{} is not checkable",
                locator.description()
            )));
        }
        if current != Some(checked) {
            let _ = state.dom.set_checked(index, checked);
            state.fire(ClickKind::Single, index, &self.dialogs);
        }
        Ok(())
    }

    async fn screenshot(&self, full_page: bool) -> PomResult<Vec<u8>> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.history.push(format!("screenshot:full_page={full_page}"));
        if state.fail_screenshots {
            return Err(PomError::driver("screenshot capture failed"));
        }
        Ok(MOCK_PNG.to_vec())
    }

    async fn set_dialog_policy(&self, policy: DialogPolicy) -> PomResult<()> {
        self.lock().history.push(format!("dialog_policy:{policy:?}"));
        self.dialogs.set_policy(policy);
        Ok(())
    }

    async fn take_dialogs(&self) -> PomResult<Vec<Dialog>> {
        Ok(self.dialogs.drain())
    }

    async fn close(&self) -> PomResult<()> {
        let mut state = self.lock();
        state.history.push("close".to_string());
        state.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dialog::DialogAction;

    const HOME: &str = "https://shop.test/";
    const CART: &str = "https://shop.test/cart.html";

    fn link() -> Locator {
        Locator::css("#cart")
    }

    fn browser() -> MockBrowser {
        let browser = MockBrowser::new()
            .route(HOME, |dom| dom.add(MockElement::new("a").answering(&link()).text("Cart")))
            .route(CART, |dom| dom.add(MockElement::new("h2").answering(&Locator::css("h2")).text("Products")));
        browser.on_click(&link(), |dom| dom.redirect(CART));
        browser
    }

    #[tokio::test]
    async fn test_navigate_renders_route() {
        let browser = browser();
        browser
            .navigate(HOME, LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(browser.query(&link()).await.unwrap().len(), 1);
        assert!(browser.was_called("navigate:https://shop.test/"));
    }

    #[tokio::test]
    async fn test_route_ignores_query_and_trailing_slash() {
        let browser = browser();
        browser
            .navigate("https://shop.test/cart.html?x=1", LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        browser
            .navigate("https://shop.test", LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_click_handler_redirects() {
        let browser = browser();
        browser
            .navigate(HOME, LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        browser.click(&link(), ClickKind::Single).await.unwrap();
        assert_eq!(browser.current_url().await.unwrap(), CART);
        assert!(browser.query(&link()).await.unwrap().is_empty());
        assert!(browser.was_called("click:#cart"));
    }

    #[tokio::test]
    async fn test_handlers_are_per_click_kind() {
        let browser = browser();
        browser
            .navigate(HOME, LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        browser.click(&link(), ClickKind::Double).await.unwrap();
        assert_eq!(browser.current_url().await.unwrap(), HOME);
    }

    #[tokio::test]
    async fn test_dialogs_follow_policy() {
        let browser = browser();
        browser.on_click(&link(), |dom| dom.raise_alert("Leaving"));
        browser
            .navigate(HOME, LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        browser.set_dialog_policy(DialogPolicy::Dismiss).await.unwrap();
        browser.click(&link(), ClickKind::Single).await.unwrap();
        let dialogs = browser.take_dialogs().await.unwrap();
        assert_eq!(dialogs.len(), 1);
        assert_eq!(dialogs[0].action(), &DialogAction::Dismiss);
        assert!(browser.take_dialogs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_context_rejects_calls() {
        let browser = browser();
        browser.close().await.unwrap();
        assert!(browser.is_closed());
        assert!(browser.query(&link()).await.is_err());
    }

    #[tokio::test]
    async fn test_fill_non_input_is_driver_error() {
        let browser = browser();
        browser
            .navigate(HOME, LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        let err = browser.fill(&link(), "x").await.unwrap_err();
        assert!(matches!(err, PomError::Driver { .. }));
    }
}
