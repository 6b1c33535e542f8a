//! admin-steps: step-definition helpers for admin UI acceptance tests.
//!
//! Thin, synchronous helpers that turn test phrases ("I open the menu
//! \"Users\"", "the popin \"delete\" should be opened", ...) into element
//! lookups and assertions against an injected [`BrowserSession`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  "When I open the menu \"Users\""                               │
//! │        │                                                        │
//! │        ▼                                                        │
//! │   Step::parse ──► AdminSteps<S> ──► Selector ──► BrowserSession  │
//! │                        │                          │             │
//! │                        └── wait::poll_until ◄─────┘             │
//! │                            (popin open / close)                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use admin_steps::{AdminSteps, MockElement, MockSession, Selector};
//!
//! let session = MockSession::new()
//!     .with_element(Selector::navbar_action("Add new"), MockElement::visible());
//! let mut admin = AdminSteps::new(session);
//!
//! admin.run_step("Then I should see \"Add new\" action in navbar").unwrap();
//! assert!(admin.run_step("Then I should not see \"Add new\" action in navbar").is_err());
//! ```

#![warn(missing_docs)]

mod admin;
mod config;
mod result;
mod select2;
mod selector;
mod session;
mod steps;
mod wait;

/// Tracing subscriber setup
pub mod logging;

/// In-memory session for tests
pub mod mock;

/// Chrome DevTools Protocol session
#[cfg(feature = "browser")]
pub mod chromium;

pub use admin::{AdminSteps, EXTENDED_CAPABILITY};
pub use config::StepsConfig;
pub use mock::{MockElement, MockSession, SessionCall};
pub use result::{StepError, StepResult};
pub use select2::{change_script, split_labels};
pub use selector::{css_string, js_string, xpath_literal, Selector};
pub use session::{element_visible, BrowserSession, ElementRef, ExtendedSession};
pub use steps::Step;
pub use wait::{
    poll_until, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

#[cfg(feature = "browser")]
pub use chromium::{ChromiumConfig, ChromiumSession};
