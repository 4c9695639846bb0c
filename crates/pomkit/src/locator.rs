//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a plain value: a selector expression plus optional text
//! filter and index. It is resolved against the live document by the driver on
//! every action, so it never holds on to an element across re-renders or
//! navigations.
//!
//! Runtime values (product names, user names) are only ever embedded through
//! [`xpath_literal`], [`css_string`] or a [`TextFilter`], never spliced into
//! selector syntax directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g. `#login2`)
    Css(String),
    /// XPath selector (e.g. `//a[@id="cartur"]`)
    XPath(String),
    /// ARIA role with optional accessible name
    Role {
        /// Role name, e.g. `button`
        role: String,
        /// Accessible name
        name: Option<String>,
    },
    /// Innermost element whose text contains the value
    Text(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: Option<&str>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.map(str::to_string),
        }
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Parse a raw selector string.
    ///
    /// `xpath=` prefixed strings and strings starting with `/` or `(` are XPath,
    /// `text=` prefixed strings are text selectors, everything else is CSS.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(rest) = trimmed.strip_prefix("xpath=") {
            Self::XPath(rest.to_string())
        } else if let Some(rest) = trimmed.strip_prefix("text=") {
            Self::Text(rest.to_string())
        } else if trimmed.starts_with('/') || trimmed.starts_with('(') {
            Self::XPath(trimmed.to_string())
        } else {
            Self::Css(trimmed.to_string())
        }
    }

    /// Canonical string form, used for matching and descriptions
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }

    fn to_js_base(&self) -> String {
        match self {
            Self::Css(css) => format!("Array.from(document.querySelectorAll({}))", js_string(css)),
            Self::XPath(xpath) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                 return out; }})()",
                js_string(xpath)
            ),
            Self::Role { role, name } => {
                let implicit = match role.as_str() {
                    "button" => "button, input[type=button], input[type=submit], ",
                    "link" => "a[href], ",
                    "checkbox" => "input[type=checkbox], ",
                    "textbox" => "input:not([type]), input[type=text], input[type=email], textarea, ",
                    _ => "",
                };
                let css = format!("{implicit}[role={}]", css_string(role));
                let name_filter = name.as_ref().map_or_else(String::new, |n| {
                    format!(
                        ".filter(el => ((el.getAttribute('aria-label') || el.textContent || '').trim()) === {})",
                        js_string(n)
                    )
                });
                format!(
                    "Array.from(document.querySelectorAll({})){name_filter}",
                    js_string(&css)
                )
            }
            Self::Text(text) => format!(
                "Array.from(document.querySelectorAll('body *')).filter(el => \
                 el.textContent.includes({t}) && \
                 !Array.from(el.children).some(c => c.textContent.includes({t})))",
                t = js_string(text)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{css}"),
            Self::XPath(xpath) => write!(f, "{xpath}"),
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name={}]", js_string(name)),
            Self::Text(text) => write!(f, "text={}", js_string(text)),
        }
    }
}

/// Textual filter applied to the elements a selector resolves to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextFilter {
    /// Element text contains the value
    Contains(String),
    /// Trimmed element text equals the value
    Exact(String),
}

impl TextFilter {
    /// Check an element's rendered text against the filter
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::Exact(expected) => text.trim() == expected,
        }
    }
}

/// Which of the matched elements a locator targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nth {
    /// Every match
    #[default]
    All,
    /// Only the first match
    First,
    /// Only the last match
    Last,
    /// The match at a zero-based index
    Index(usize),
}

impl Nth {
    /// Narrow a resolved list of matches
    #[must_use]
    pub fn select<T>(self, mut matches: Vec<T>) -> Vec<T> {
        match self {
            Self::All => matches,
            Self::First => {
                matches.truncate(1);
                matches
            }
            Self::Last => matches.pop().into_iter().collect(),
            Self::Index(i) => {
                if i < matches.len() {
                    vec![matches.swap_remove(i)]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// A deferred reference to zero or more elements on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    filter: Option<TextFilter>,
    nth: Nth,
    description: Option<String>,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            filter: None,
            nth: Nth::All,
            description: None,
        }
    }

    /// Create a locator with a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::css(selector))
    }

    /// Create a locator with an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::xpath(selector))
    }

    /// Create a locator by ARIA role and accessible name
    #[must_use]
    pub fn role(role: impl Into<String>, name: &str) -> Self {
        Self::from_selector(Selector::role(role, Some(name)))
    }

    /// Create a locator for the innermost element containing `text`
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::text(text))
    }

    /// Create a locator from a raw selector string (see [`Selector::parse`])
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_selector(Selector::parse(raw))
    }

    /// Keep only elements whose text contains `text`
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.filter = Some(TextFilter::Contains(text.into()));
        self
    }

    /// Keep only elements whose trimmed text equals `text`
    #[must_use]
    pub fn with_exact_text(mut self, text: impl Into<String>) -> Self {
        self.filter = Some(TextFilter::Exact(text.into()));
        self
    }

    /// Target the first match
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.nth = Nth::First;
        self
    }

    /// Target the last match
    #[must_use]
    pub const fn last(mut self) -> Self {
        self.nth = Nth::Last;
        self
    }

    /// Target the match at a zero-based index
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.nth = Nth::Index(index);
        self
    }

    /// Attach a human-readable name used in logs and error messages
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the text filter
    #[must_use]
    pub const fn filter(&self) -> Option<&TextFilter> {
        self.filter.as_ref()
    }

    /// Get the index selection
    #[must_use]
    pub const fn index(&self) -> Nth {
        self.nth
    }

    /// Human-readable description (explicit name, or the selector itself)
    #[must_use]
    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.to_string())
    }

    /// JavaScript expression evaluating to the array of matched elements.
    ///
    /// Every embedded string is JSON-encoded.
    #[must_use]
    pub fn to_js(&self) -> String {
        let base = self.selector.to_js_base();
        let filtered = match &self.filter {
            None => base,
            Some(TextFilter::Contains(text)) => format!(
                "{base}.filter(el => (el.innerText || el.textContent || '').includes({}))",
                js_string(text)
            ),
            Some(TextFilter::Exact(text)) => format!(
                "{base}.filter(el => (el.innerText || el.textContent || '').trim() === {})",
                js_string(text)
            ),
        };
        match self.nth {
            Nth::All => filtered,
            Nth::First => format!("{filtered}.slice(0, 1)"),
            Nth::Last => format!("{filtered}.slice(-1)"),
            Nth::Index(i) => format!("{filtered}.slice({i}, {})", i + 1),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        match &self.filter {
            Some(TextFilter::Contains(t)) => write!(f, " >> has-text={}", js_string(t))?,
            Some(TextFilter::Exact(t)) => write!(f, " >> text-is={}", js_string(t))?,
            None => {}
        }
        match self.nth {
            Nth::All => Ok(()),
            Nth::First => write!(f, " >> first"),
            Nth::Last => write!(f, " >> last"),
            Nth::Index(i) => write!(f, " >> nth={i}"),
        }
    }
}

/// Quote a value as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so values holding both quote kinds are
/// emitted as a `concat()` of literal pieces.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let pieces: Vec<String> = value
            .split('"')
            .map(|piece| format!("\"{piece}\""))
            .collect();
        format!("concat({})", pieces.join(", '\"', "))
    }
}

/// Quote a value as a CSS string (for attribute selectors).
#[must_use]
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote a value as a JavaScript string literal
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
