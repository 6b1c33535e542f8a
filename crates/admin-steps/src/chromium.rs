//! Blocking [`BrowserSession`] over the Chrome DevTools Protocol.
//!
//! chromiumoxide is async; the session owns a private tokio runtime and blocks
//! on every call, matching the synchronous step model. Found elements are kept
//! in a page-side registry (`window.__adminSteps`) and addressed by index, so
//! handles die with the page like any other element reference.

use crate::result::{StepError, StepResult};
use crate::selector::{js_string, Selector};
use crate::session::{BrowserSession, ElementRef, ExtendedSession};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

const REGISTRY: &str = "window.__adminSteps";
const HANDLE_PREFIX: &str = "cdp-";

/// Launch configuration for [`ChromiumSession`]
#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Base URL paths are resolved against
    pub base_url: String,
    /// Run in headless mode
    pub headless: bool,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            headless: true,
            sandbox: true,
            chromium_path: None,
        }
    }
}

impl ChromiumConfig {
    /// Config for an application served at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Absolute URL for `path`; absolute URLs pass through
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Chromium-backed session with the extended capability set
#[derive(Debug)]
pub struct ChromiumSession {
    config: ChromiumConfig,
    runtime: Runtime,
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launch a browser and open a blank page
    pub fn launch(config: ChromiumConfig) -> StepResult<Self> {
        let runtime = Runtime::new()?;

        let mut builder = BrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(StepError::session)?;

        let (browser, mut handler) = runtime
            .block_on(Browser::launch(cdp_config))
            .map_err(|e| StepError::session(format!("failed to launch browser: {e}")))?;

        let handler = runtime.spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = runtime
            .block_on(browser.new_page("about:blank"))
            .map_err(|e| StepError::session(e.to_string()))?;

        tracing::info!(base_url = %config.base_url, "chromium session started");
        Ok(Self {
            config,
            runtime,
            browser,
            page,
            handler,
        })
    }

    /// The launch configuration
    #[must_use]
    pub const fn config(&self) -> &ChromiumConfig {
        &self.config
    }

    fn eval<T: serde::de::DeserializeOwned>(&self, script: &str) -> StepResult<T> {
        let result = self
            .runtime
            .block_on(self.page.evaluate(script))
            .map_err(|e| StepError::session(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| StepError::session(e.to_string()))
    }

    fn run(&self, script: &str) -> StepResult<()> {
        self.runtime
            .block_on(self.page.evaluate(script))
            .map_err(|e| StepError::session(e.to_string()))?;
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        let _ = self.runtime.block_on(self.browser.close());
        self.handler.abort();
    }
}

fn handle_index(element: &ElementRef) -> StepResult<usize> {
    element
        .id()
        .strip_prefix(HANDLE_PREFIX)
        .and_then(|i| i.parse().ok())
        .ok_or_else(|| StepError::session(format!("not a chromium element handle: {}", element.id())))
}

/// Script registering the first match of `selector`; yields its index or -1.
///
/// An element already in the registry keeps its index, so repeated lookups
/// while polling do not grow it.
#[must_use]
pub fn register_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return -1; {REGISTRY} = {REGISTRY} || []; \
         const known = {REGISTRY}.indexOf(el); if (known >= 0) return known; \
         {REGISTRY}.push(el); return {REGISTRY}.length - 1; }})()",
        selector.to_query()
    )
}

fn with_element(index: usize, body: &str) -> String {
    format!(
        "(() => {{ const el = ({REGISTRY} || [])[{index}]; if (!el) throw new Error('stale element reference'); {body} }})()"
    )
}

/// Script yielding whether a registered element is rendered
#[must_use]
pub fn visibility_script(index: usize) -> String {
    with_element(
        index,
        "const style = window.getComputedStyle(el); \
         return style.visibility !== 'hidden' && style.display !== 'none' && \
         (el.offsetWidth > 0 || el.offsetHeight > 0 || el.getClientRects().length > 0);",
    )
}

/// Script yielding a registered element's attribute, JSON encoded
#[must_use]
pub fn attribute_script(index: usize, name: &str) -> String {
    with_element(
        index,
        &format!("return JSON.stringify(el.getAttribute({}));", js_string(name)),
    )
}

/// Script clicking a registered element
#[must_use]
pub fn click_script(index: usize) -> String {
    with_element(index, "el.click(); return true;")
}

/// Script filling a field found by id, name, label text or placeholder
#[must_use]
pub fn fill_script(locator: &str, value: &str) -> String {
    let locator = js_string(locator);
    let value = js_string(value);
    format!(
        "(() => {{ const key = {locator}; \
         let el = document.getElementById(key) || document.getElementsByName(key)[0]; \
         if (!el) {{ const label = Array.from(document.querySelectorAll('label')).find(l => l.textContent.trim() === key); \
         if (label) el = label.control; }} \
         if (!el) el = Array.from(document.querySelectorAll('input, textarea')).find(i => i.placeholder === key); \
         if (!el) return false; \
         el.value = {value}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true; }})()"
    )
}

/// Script pressing a button found by id, name, value or text
#[must_use]
pub fn press_script(label: &str) -> String {
    format!(
        "(() => {{ const key = {}; \
         const el = Array.from(document.querySelectorAll('button, input[type=submit], input[type=button], input[type=reset], input[type=image]')) \
         .find(b => b.id === key || b.name === key || b.value === key || b.textContent.trim() === key); \
         if (!el) return false; el.click(); return true; }})()",
        js_string(label)
    )
}

impl BrowserSession for ChromiumSession {
    fn visit_path(&mut self, path: &str) -> StepResult<()> {
        let url = self.config.resolve(path);
        tracing::debug!(%url, "navigating");
        self.runtime
            .block_on(self.page.goto(url.as_str()))
            .map_err(|e| StepError::session(format!("navigation to {url} failed: {e}")))?;
        Ok(())
    }

    fn fill_field(&mut self, locator: &str, value: &str) -> StepResult<()> {
        if self.eval::<bool>(&fill_script(locator, value))? {
            Ok(())
        } else {
            Err(StepError::ElementNotFound {
                selector: "form field".to_string(),
                what: "id|name|label|placeholder".to_string(),
                value: locator.to_string(),
            })
        }
    }

    fn press_button(&mut self, label: &str) -> StepResult<()> {
        if self.eval::<bool>(&press_script(label))? {
            Ok(())
        } else {
            Err(StepError::ElementNotFound {
                selector: "button".to_string(),
                what: "id|name|value|text".to_string(),
                value: label.to_string(),
            })
        }
    }

    fn find(&mut self, selector: &Selector) -> StepResult<Option<ElementRef>> {
        let index: i64 = self.eval(&register_script(selector))?;
        Ok(usize::try_from(index)
            .ok()
            .map(|i| ElementRef::new(format!("{HANDLE_PREFIX}{i}"))))
    }

    fn click(&mut self, element: &ElementRef) -> StepResult<()> {
        let index = handle_index(element)?;
        self.run(&click_script(index))
    }

    fn is_visible(&mut self, element: &ElementRef) -> StepResult<bool> {
        let index = handle_index(element)?;
        self.eval(&visibility_script(index))
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> StepResult<Option<String>> {
        let index = handle_index(element)?;
        let encoded: String = self.eval(&attribute_script(index, name))?;
        Ok(serde_json::from_str(&encoded)?)
    }

    fn execute_script(&mut self, source: &str) -> StepResult<()> {
        self.run(source)
    }

    fn extended(&mut self) -> Option<&mut dyn ExtendedSession> {
        Some(self)
    }
}

impl ExtendedSession for ChromiumSession {
    fn click_element(&mut self, css: &str) -> StepResult<()> {
        let selector = Selector::css(css);
        let element = self.find(&selector)?.ok_or_else(|| StepError::ElementNotFound {
            selector: selector.to_string(),
            what: "css".to_string(),
            value: css.to_string(),
        })?;
        self.click(&element)
    }
}
