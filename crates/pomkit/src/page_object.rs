//! Page Object Model support.
//!
//! A page object owns one locator registry value and a [`PageActions`]
//! handle, and exposes intention-revealing operations built from them. It
//! never hands raw selector strings to callers.

use crate::actions::PageActions;
use crate::locator::Locator;
use crate::result::PomResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for page objects representing a page or component in the UI.
///
/// # Example
///
/// ```ignore
/// struct SearchPage {
///     actions: PageActions,
///     locators: SearchLocators,
/// }
///
/// impl PageObject for SearchPage {
///     fn name(&self) -> &'static str {
///         "search"
///     }
///
///     fn url_pattern(&self) -> &str {
///         "/search"
///     }
///
///     fn actions(&self) -> &PageActions {
///         &self.actions
///     }
/// }
/// ```
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Page name for logging
    fn name(&self) -> &'static str;

    /// URL path pattern that matches this page (see [`UrlMatcher`])
    fn url_pattern(&self) -> &str;

    /// Action handle the page drives the browser through
    fn actions(&self) -> &PageActions;

    /// Element whose visibility marks the page as rendered
    fn ready_marker(&self) -> Option<&Locator> {
        None
    }

    /// Whether the current document is this page and its marker is visible
    async fn is_loaded(&self) -> PomResult<bool> {
        let url = self.actions().current_url().await?;
        if !UrlMatcher::new(self.url_pattern()).matches(&url) {
            return Ok(false);
        }
        match self.ready_marker() {
            Some(marker) => self.actions().is_visible(marker).await,
            None => Ok(true),
        }
    }
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    alternatives: Vec<Vec<UrlSegment>>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/cart.html`
    /// - Wildcards: `/users/*`
    /// - Named parameters: `/users/:id`
    /// - Alternatives separated by `|`: `/|/index.html`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let alternatives = pattern
            .split('|')
            .map(|alt| {
                alt.split('/')
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        if s == "*" {
                            UrlSegment::Wildcard
                        } else if let Some(name) = s.strip_prefix(':') {
                            UrlSegment::Parameter(name.to_string())
                        } else {
                            UrlSegment::Literal(s.to_string())
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            alternatives,
        }
    }

    /// Path segments of a URL, ignoring scheme, host, query and fragment
    fn path_segments(url: &str) -> Vec<&str> {
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path = if url.contains("://") {
            without_scheme.find('/').map_or("", |i| &without_scheme[i..])
        } else {
            without_scheme
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Check if a URL (absolute or path-only) matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        self.matching_alternative(url).is_some()
    }

    fn matching_alternative(&self, url: &str) -> Option<&[UrlSegment]> {
        let url_segments = Self::path_segments(url);
        self.alternatives
            .iter()
            .find(|segments| {
                segments.len() == url_segments.len()
                    && segments.iter().zip(&url_segments).all(|(segment, actual)| {
                        match segment {
                            UrlSegment::Literal(lit) => lit == actual,
                            UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
                        }
                    })
            })
            .map(Vec::as_slice)
    }

    /// Extract parameters from a URL
    #[must_use]
    pub fn extract_params(&self, url: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let Some(segments) = self.matching_alternative(url) else {
            return params;
        };
        for (segment, value) in segments.iter().zip(Self::path_segments(url)) {
            if let UrlSegment::Parameter(name) = segment {
                let _ = params.insert(name.clone(), value.to_string());
            }
        }
        params
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
