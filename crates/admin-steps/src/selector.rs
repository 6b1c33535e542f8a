//! Selector expressions for locating admin UI elements.
//!
//! Every selector built from caller text goes through [`xpath_literal`] or
//! [`css_string`], so labels containing quotes produce valid expressions
//! instead of broken (or injected) ones.

use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "div.modal")
    Css(String),
    /// XPath selector
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Lookup strategy name ("css" or "xpath")
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
        }
    }

    /// Raw expression text
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Menu entry in the side navigation whose text equals `text` exactly
    #[must_use]
    pub fn menu_item(text: &str) -> Self {
        Self::XPath(format!("//aside//span[text()={}]", xpath_literal(text)))
    }

    /// Link in the top navigation bar whose rendered text contains `text`
    #[must_use]
    pub fn navbar_action(text: &str) -> Self {
        Self::XPath(format!("//nav//a[contains(.,{})]", xpath_literal(text)))
    }

    /// Modal `div` whose id ends with `suffix`
    #[must_use]
    pub fn popin(suffix: &str) -> Self {
        Self::Css(format!("div.modal[id$={}]", css_string(suffix)))
    }

    /// Any element with the `modal` class whose id ends with `suffix`
    #[must_use]
    pub fn modal_by_id_suffix(suffix: &str) -> Self {
        Self::Css(format!("[id$={}].modal", css_string(suffix)))
    }

    /// `<option>` of the `<select>` with id `field` whose text equals `label`
    #[must_use]
    pub fn select_option(field: &str, label: &str) -> Self {
        Self::XPath(format!(
            "//select[@id={}]//option[text()={}]",
            xpath_literal(field),
            xpath_literal(label)
        ))
    }

    /// JavaScript expression resolving to the first matching element (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({})", js_string(s)),
            Self::XPath(s) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(s)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy(), self.expression())
    }
}

/// Quote `text` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text holding both quote kinds is split
/// and rebuilt with `concat()`.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    let parts: Vec<String> = text.split('"').map(|p| format!("\"{p}\"")).collect();
    format!("concat({})", parts.join(",'\"',"))
}

/// Quote `text` as a CSS string (for attribute selectors)
#[must_use]
pub fn css_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote `text` as a JavaScript string literal
#[must_use]
pub fn js_string(text: &str) -> String {
    // JSON strings are valid JS string literals
    serde_json::Value::String(text.to_string()).to_string()
}
