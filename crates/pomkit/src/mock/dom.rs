//! In-memory document model for [`MockBrowser`](super::MockBrowser).

use crate::dialog::{Dialog, DialogType};
use crate::driver::{BoundingBox, ElementSnapshot};
use crate::locator::Locator;
use std::time::Duration;
use tokio::time::Instant;

/// One element of the mock document
#[derive(Debug, Clone)]
pub struct MockElement {
    tag: String,
    keys: Vec<String>,
    text: String,
    value: Option<String>,
    hidden: bool,
    visible_at: Option<Instant>,
    enabled: bool,
    checked: Option<bool>,
    bounds: BoundingBox,
}

impl MockElement {
    /// Create a visible, enabled element
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            keys: Vec::new(),
            text: String::new(),
            value: None,
            hidden: false,
            visible_at: None,
            enabled: true,
            checked: None,
            bounds: BoundingBox::new(0.0, 0.0, 120.0, 24.0),
        }
    }

    /// Create an empty text input
    #[must_use]
    pub fn input() -> Self {
        Self::new("input").value("")
    }

    /// Create an unchecked checkbox
    #[must_use]
    pub fn checkbox() -> Self {
        Self::new("input").checked(false)
    }

    /// Make the element match `locator`'s selector
    #[must_use]
    pub fn answering(mut self, locator: &Locator) -> Self {
        self.keys.push(locator.selector().key());
        self
    }

    /// Set rendered text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set form value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Render hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Become visible only after `delay`
    #[must_use]
    pub fn visible_after(mut self, delay: Duration) -> Self {
        self.visible_at = Some(Instant::now() + delay);
        self
    }

    /// Render disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set checked state (makes the element checkable)
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Set layout box
    #[must_use]
    pub const fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Whether the element answers to `key`
    #[must_use]
    pub fn answers(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Selector keys this element answers to
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn is_visible(&self, now: Instant) -> bool {
        !self.hidden && self.visible_at.map_or(true, |at| now >= at)
    }

    /// Point-in-time view as a driver would report it
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> ElementSnapshot {
        let visible = self.is_visible(now);
        ElementSnapshot {
            tag: self.tag.clone(),
            text: self.text.clone(),
            value: self.value.clone(),
            visible,
            enabled: self.enabled,
            checked: self.checked,
            bounds: visible.then_some(self.bounds),
        }
    }
}

/// Mutable document state seen by routes and event handlers
#[derive(Debug, Default)]
pub struct MockDom {
    url: String,
    elements: Vec<MockElement>,
    raised: Vec<Dialog>,
    redirect: Option<String>,
}

impl MockDom {
    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn reset(&mut self, url: &str) {
        self.url = url.to_string();
        self.elements.clear();
        self.redirect = None;
    }

    /// Append an element
    pub fn add(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Indices of the elements `locator` resolves to, in document order
    #[must_use]
    pub fn resolve(&self, locator: &Locator) -> Vec<usize> {
        let key = locator.selector().key();
        let matches: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.answers(&key))
            .filter(|(_, e)| locator.filter().map_or(true, |f| f.matches(&e.text)))
            .map(|(i, _)| i)
            .collect();
        locator.index().select(matches)
    }

    /// Snapshots of the elements `locator` resolves to
    #[must_use]
    pub fn query(&self, locator: &Locator) -> Vec<ElementSnapshot> {
        let now = Instant::now();
        self.resolve(locator)
            .into_iter()
            .map(|i| self.elements[i].snapshot(now))
            .collect()
    }

    /// Element at a resolved index
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&MockElement> {
        self.elements.get(index)
    }

    /// Mutable element at a resolved index
    pub fn element_mut(&mut self, index: usize) -> Option<&mut MockElement> {
        self.elements.get_mut(index)
    }

    /// Remove every element `locator` resolves to
    pub fn remove(&mut self, locator: &Locator) {
        let doomed = self.resolve(locator);
        let mut index = 0;
        self.elements.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
    }

    /// Show or hide every element `locator` resolves to
    pub fn set_visible(&mut self, locator: &Locator, visible: bool) {
        for i in self.resolve(locator) {
            let element = &mut self.elements[i];
            element.hidden = !visible;
            element.visible_at = None;
        }
    }

    /// Replace the text of every element `locator` resolves to
    pub fn set_text(&mut self, locator: &Locator, text: &str) {
        for i in self.resolve(locator) {
            self.elements[i].text = text.to_string();
        }
    }

    /// Value of the first element `locator` resolves to
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.resolve(locator)
            .first()
            .and_then(|&i| self.elements[i].value.clone())
    }

    /// Checked state of the first element `locator` resolves to
    #[must_use]
    pub fn checked_of(&self, locator: &Locator) -> Option<bool> {
        self.resolve(locator)
            .first()
            .and_then(|&i| self.elements[i].checked)
    }

    pub(crate) fn set_value(&mut self, index: usize, value: &str) -> bool {
        match self.elements.get_mut(index) {
            Some(element) if element.value.is_some() => {
                element.value = Some(value.to_string());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_checked(&mut self, index: usize, checked: bool) -> bool {
        match self.elements.get_mut(index) {
            Some(element) if element.checked.is_some() => {
                element.checked = Some(checked);
                true
            }
            _ => false,
        }
    }

    /// Open an alert, answered by the browser's dialog policy
    pub fn raise_alert(&mut self, message: &str) {
        self.raised.push(Dialog::new(DialogType::Alert, message));
    }

    /// Navigate to `url` once the current event handler returns
    pub fn redirect(&mut self, url: impl Into<String>) {
        self.redirect = Some(url.into());
    }

    pub(crate) fn take_raised(&mut self) -> Vec<Dialog> {
        std::mem::take(&mut self.raised)
    }

    pub(crate) fn take_redirect(&mut self) -> Option<String> {
        self.redirect.take()
    }
}
