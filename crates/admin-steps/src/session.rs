//! Browser session abstraction consumed by the step helpers.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  AdminSteps<S: BrowserSession>                               │
//! ├──────────────────────────────────────────────────────────────┤
//! │  BrowserSession      visit / fill / press / find / script    │
//! │    └─ ExtendedSession   click_element / wait visible|hidden  │
//! │                                                              │
//! │  MockSession (in-memory)     ChromiumSession (CDP, feature)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session opts into the extended capability set by returning itself from
//! [`BrowserSession::extended`].

use crate::result::StepResult;
use crate::selector::Selector;
use crate::wait::{poll_until, WaitOptions, WaitResult};
use serde::{Deserialize, Serialize};

/// Opaque handle to an element found on the current page.
///
/// Only meaningful to the session that produced it, and only until the page
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    id: String,
}

impl ElementRef {
    /// Create a handle from a session-specific identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Session-specific identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Core browser capabilities every step needs.
///
/// Methods take `&mut self`: a session belongs to exactly one scenario.
pub trait BrowserSession {
    /// Navigate to a path relative to the application base URL
    fn visit_path(&mut self, path: &str) -> StepResult<()>;

    /// Fill a form field located by id, name, or label
    fn fill_field(&mut self, locator: &str, value: &str) -> StepResult<()>;

    /// Press a button located by id, name, value, or text
    fn press_button(&mut self, label: &str) -> StepResult<()>;

    /// First element matching `selector`, if any
    fn find(&mut self, selector: &Selector) -> StepResult<Option<ElementRef>>;

    /// Click an element
    fn click(&mut self, element: &ElementRef) -> StepResult<()>;

    /// Whether an element is rendered
    fn is_visible(&mut self, element: &ElementRef) -> StepResult<bool>;

    /// Read an attribute of an element
    fn attribute(&mut self, element: &ElementRef, name: &str) -> StepResult<Option<String>>;

    /// Run JavaScript in the page
    fn execute_script(&mut self, source: &str) -> StepResult<()>;

    /// The extended capability set, when this session provides it
    fn extended(&mut self) -> Option<&mut dyn ExtendedSession> {
        None
    }
}

/// Optional capabilities used by the popin flows.
pub trait ExtendedSession: BrowserSession {
    /// Click the first element matching a CSS selector
    fn click_element(&mut self, css: &str) -> StepResult<()>;

    /// Wait until an element matching `css` is present and visible
    fn wait_for_css_visible(&mut self, css: &str, options: &WaitOptions) -> StepResult<WaitResult> {
        let selector = Selector::css(css);
        let waited_for = format!("{selector} to be visible");
        poll_until(&waited_for, options, || {
            element_visible(&mut *self, &selector).map(|v| v == Some(true))
        })
    }

    /// Wait until no visible element matches `css`
    fn wait_for_css_invisible(
        &mut self,
        css: &str,
        options: &WaitOptions,
    ) -> StepResult<WaitResult> {
        let selector = Selector::css(css);
        let waited_for = format!("{selector} to be hidden");
        poll_until(&waited_for, options, || {
            element_visible(&mut *self, &selector).map(|v| v != Some(true))
        })
    }
}

/// Look up `selector` and report its visibility: `None` when absent.
pub fn element_visible<S>(session: &mut S, selector: &Selector) -> StepResult<Option<bool>>
where
    S: BrowserSession + ?Sized,
{
    match session.find(selector)? {
        Some(element) => session.is_visible(&element).map(Some),
        None => Ok(None),
    }
}

impl<S: BrowserSession + ?Sized> BrowserSession for &mut S {
    fn visit_path(&mut self, path: &str) -> StepResult<()> {
        (**self).visit_path(path)
    }

    fn fill_field(&mut self, locator: &str, value: &str) -> StepResult<()> {
        (**self).fill_field(locator, value)
    }

    fn press_button(&mut self, label: &str) -> StepResult<()> {
        (**self).press_button(label)
    }

    fn find(&mut self, selector: &Selector) -> StepResult<Option<ElementRef>> {
        (**self).find(selector)
    }

    fn click(&mut self, element: &ElementRef) -> StepResult<()> {
        (**self).click(element)
    }

    fn is_visible(&mut self, element: &ElementRef) -> StepResult<bool> {
        (**self).is_visible(element)
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> StepResult<Option<String>> {
        (**self).attribute(element, name)
    }

    fn execute_script(&mut self, source: &str) -> StepResult<()> {
        (**self).execute_script(source)
    }

    fn extended(&mut self) -> Option<&mut dyn ExtendedSession> {
        (**self).extended()
    }
}
