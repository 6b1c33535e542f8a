//! In-memory browser session for testing step helpers without a browser.
//!
//! The page is a list of elements keyed by the exact [`Selector`] a step will
//! build, so tests describe pages in terms of what the steps look up. Every
//! call is recorded for ordering assertions.
//!
//! ```ignore
//! let mut session = MockSession::new()
//!     .with_extended()
//!     .with_element(Selector::css("#delete"), MockElement::visible())
//!     .with_element(Selector::modal_by_id_suffix("confirm"), MockElement::hidden())
//!     .on_click_show(Selector::css("#delete"), Selector::modal_by_id_suffix("confirm"));
//! ```

use crate::result::{StepError, StepResult};
use crate::selector::Selector;
use crate::session::{BrowserSession, ElementRef, ExtendedSession};
use std::collections::HashMap;

/// A call made against a [`MockSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    /// `visit_path`
    VisitPath(String),
    /// `fill_field`
    FillField {
        /// Field locator
        locator: String,
        /// Value written
        value: String,
    },
    /// `press_button`
    PressButton(String),
    /// `find`
    Find(Selector),
    /// `click` on the element registered under this selector
    Click(Selector),
    /// `is_visible` on the element registered under this selector
    IsVisible(Selector),
    /// `attribute`
    Attribute {
        /// Element selector
        selector: Selector,
        /// Attribute name
        name: String,
    },
    /// `execute_script`
    ExecuteScript(String),
    /// `click_element`
    ClickElement(String),
}

/// Effect of clicking an element
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClickEffect {
    Show(Selector),
    Hide(Selector),
}

/// An element on the mock page
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    visible: bool,
    attributes: HashMap<String, String>,
    /// Visibility checks left before the element turns visible
    reveal_after: Option<usize>,
}

impl MockElement {
    /// A rendered element
    #[must_use]
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// A present but not rendered element
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Turn visible after `checks` visibility checks have seen it hidden
    #[must_use]
    pub const fn visible_after(mut self, checks: usize) -> Self {
        self.reveal_after = Some(checks);
        self
    }

    /// An `<option>` with a `value` attribute
    #[must_use]
    pub fn option(value: impl Into<String>) -> Self {
        Self::visible().with_attribute("value", value)
    }
}

/// In-memory [`BrowserSession`] implementation
#[derive(Debug, Default)]
pub struct MockSession {
    elements: Vec<(Selector, MockElement)>,
    click_effects: Vec<(Selector, ClickEffect)>,
    extended: bool,
    calls: Vec<SessionCall>,
}

impl MockSession {
    /// Create an empty page without the extended capability
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise the extended capability set
    #[must_use]
    pub const fn with_extended(mut self) -> Self {
        self.extended = true;
        self
    }

    /// Add an element reachable through `selector`
    #[must_use]
    pub fn with_element(mut self, selector: Selector, element: MockElement) -> Self {
        self.elements.push((selector, element));
        self
    }

    /// Clicking `trigger` makes `target` visible
    #[must_use]
    pub fn on_click_show(mut self, trigger: Selector, target: Selector) -> Self {
        self.click_effects.push((trigger, ClickEffect::Show(target)));
        self
    }

    /// Clicking `trigger` hides `target`
    #[must_use]
    pub fn on_click_hide(mut self, trigger: Selector, target: Selector) -> Self {
        self.click_effects.push((trigger, ClickEffect::Hide(target)));
        self
    }

    /// Every call made so far, in order
    #[must_use]
    pub fn calls(&self) -> &[SessionCall] {
        &self.calls
    }

    /// Scripts executed so far
    #[must_use]
    pub fn scripts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SessionCall::ExecuteScript(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of clicks (element or selector) made so far
    #[must_use]
    pub fn click_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SessionCall::Click(_) | SessionCall::ClickElement(_)))
            .count()
    }

    /// Current visibility of the element registered under `selector`
    #[must_use]
    pub fn is_shown(&self, selector: &Selector) -> Option<bool> {
        self.elements
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, e)| e.visible)
    }

    fn index_of(&self, selector: &Selector) -> Option<usize> {
        self.elements.iter().position(|(s, _)| s == selector)
    }

    fn resolve(&self, element: &ElementRef) -> StepResult<usize> {
        element
            .id()
            .strip_prefix("mock-")
            .and_then(|i| i.parse::<usize>().ok())
            .filter(|i| *i < self.elements.len())
            .ok_or_else(|| StepError::session(format!("stale element reference {}", element.id())))
    }

    fn apply_click(&mut self, index: usize) {
        let trigger = self.elements[index].0.clone();
        let effects: Vec<ClickEffect> = self
            .click_effects
            .iter()
            .filter(|(t, _)| *t == trigger)
            .map(|(_, e)| e.clone())
            .collect();
        for effect in effects {
            let (target, visible) = match effect {
                ClickEffect::Show(target) => (target, true),
                ClickEffect::Hide(target) => (target, false),
            };
            if let Some(i) = self.index_of(&target) {
                let element = &mut self.elements[i].1;
                element.visible = visible;
                element.reveal_after = None;
            }
        }
    }
}

impl BrowserSession for MockSession {
    fn visit_path(&mut self, path: &str) -> StepResult<()> {
        self.calls.push(SessionCall::VisitPath(path.to_string()));
        Ok(())
    }

    fn fill_field(&mut self, locator: &str, value: &str) -> StepResult<()> {
        self.calls.push(SessionCall::FillField {
            locator: locator.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn press_button(&mut self, label: &str) -> StepResult<()> {
        self.calls.push(SessionCall::PressButton(label.to_string()));
        Ok(())
    }

    fn find(&mut self, selector: &Selector) -> StepResult<Option<ElementRef>> {
        self.calls.push(SessionCall::Find(selector.clone()));
        Ok(self
            .index_of(selector)
            .map(|i| ElementRef::new(format!("mock-{i}"))))
    }

    fn click(&mut self, element: &ElementRef) -> StepResult<()> {
        let index = self.resolve(element)?;
        self.calls
            .push(SessionCall::Click(self.elements[index].0.clone()));
        self.apply_click(index);
        Ok(())
    }

    fn is_visible(&mut self, element: &ElementRef) -> StepResult<bool> {
        let index = self.resolve(element)?;
        let (selector, el) = &mut self.elements[index];
        self.calls.push(SessionCall::IsVisible(selector.clone()));
        let visible = el.visible;
        if let Some(left) = el.reveal_after {
            if left <= 1 {
                el.visible = true;
                el.reveal_after = None;
            } else {
                el.reveal_after = Some(left - 1);
            }
        }
        Ok(visible)
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> StepResult<Option<String>> {
        let index = self.resolve(element)?;
        let (selector, el) = &self.elements[index];
        self.calls.push(SessionCall::Attribute {
            selector: selector.clone(),
            name: name.to_string(),
        });
        Ok(el.attributes.get(name).cloned())
    }

    fn execute_script(&mut self, source: &str) -> StepResult<()> {
        self.calls.push(SessionCall::ExecuteScript(source.to_string()));
        Ok(())
    }

    fn extended(&mut self) -> Option<&mut dyn ExtendedSession> {
        if self.extended {
            Some(self)
        } else {
            None
        }
    }
}

impl ExtendedSession for MockSession {
    fn click_element(&mut self, css: &str) -> StepResult<()> {
        self.calls.push(SessionCall::ClickElement(css.to_string()));
        let selector = Selector::css(css);
        let index = self.index_of(&selector).ok_or_else(|| StepError::ElementNotFound {
            selector: selector.to_string(),
            what: "css".to_string(),
            value: css.to_string(),
        })?;
        self.apply_click(index);
        Ok(())
    }
}
