//! Admin UI step helpers.
//!
//! Each operation is a single lookup/act/assert pass against the live page;
//! nothing is cached between calls. The popin open/close checks are the only
//! operations that wait.

use crate::config::StepsConfig;
use crate::result::{StepError, StepResult};
use crate::select2;
use crate::selector::Selector;
use crate::session::{element_visible, BrowserSession, ElementRef, ExtendedSession};

/// Name reported when the extended capability is missing
pub const EXTENDED_CAPABILITY: &str = "ExtendedSession";

/// Step helpers bound to one browser session
#[derive(Debug)]
pub struct AdminSteps<S> {
    session: S,
    config: StepsConfig,
}

impl<S: BrowserSession> AdminSteps<S> {
    /// Wrap a session with default configuration
    pub fn new(session: S) -> Self {
        Self::with_config(session, StepsConfig::default())
    }

    /// Wrap a session with explicit configuration
    pub const fn with_config(session: S, config: StepsConfig) -> Self {
        Self { session, config }
    }

    /// The wrapped session
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// The wrapped session, mutably
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// The active configuration
    pub const fn config(&self) -> &StepsConfig {
        &self.config
    }

    /// Give the session back
    pub fn into_session(self) -> S {
        self.session
    }

    /// Log in through the admin login form.
    ///
    /// Credential validity is not checked here; a rejected login shows up in
    /// whatever step runs next.
    pub fn login(&mut self, username: &str, password: &str) -> StepResult<()> {
        tracing::info!(username, path = %self.config.login_path, "logging in");
        self.session.visit_path(&self.config.login_path)?;
        self.session.fill_field(&self.config.username_field, username)?;
        self.session.fill_field(&self.config.password_field, password)?;
        self.session.press_button(&self.config.submit_button)
    }

    /// Click the side menu entry whose text is exactly `text`
    pub fn open_menu_item_by_text(&mut self, text: &str) -> StepResult<()> {
        let selector = Selector::menu_item(text);
        let element = self.require(&selector, text)?;
        self.session.click(&element)
    }

    /// Assert a navbar link containing `text` exists and is visible
    pub fn should_see_action_in_navbar(&mut self, text: &str) -> StepResult<()> {
        let selector = Selector::navbar_action(text);
        let element = self.require(&selector, text)?;
        if !self.session.is_visible(&element)? {
            tracing::warn!(text, "navbar action present but hidden");
            return Err(StepError::ElementNotVisible {
                message: format!("Cannot find action \"{text}\" in Navbar action"),
            });
        }
        Ok(())
    }

    /// Assert no navbar link contains `text`, visible or not
    pub fn should_not_see_action_in_navbar(&mut self, text: &str) -> StepResult<()> {
        let selector = Selector::navbar_action(text);
        tracing::debug!(%selector, "checking navbar action is absent");
        if self.session.find(&selector)?.is_some() {
            tracing::warn!(text, "navbar action unexpectedly present");
            return Err(StepError::UnexpectedElementPresent {
                message: format!("Action \"{text}\" has been found in Navbar action"),
            });
        }
        Ok(())
    }

    /// Click the navbar link containing `text`
    pub fn click_on_action_in_navbar(&mut self, text: &str) -> StepResult<()> {
        let selector = Selector::navbar_action(text);
        let element = self.require(&selector, text)?;
        self.session.click(&element)
    }

    /// Click `element` (CSS) and wait for the popin whose id ends with `popin_id_suffix`
    pub fn clicking_on_element_should_open_popin(
        &mut self,
        element: &str,
        popin_id_suffix: &str,
    ) -> StepResult<()> {
        let wait = self.config.popin_wait();
        wait.validate()?;
        let modal = Selector::modal_by_id_suffix(popin_id_suffix);
        let ext = extended(&mut self.session, "clicking_on_element_should_open_popin")?;
        tracing::debug!(element, %modal, "clicking and waiting for popin");
        ext.click_element(element)?;
        ext.wait_for_css_visible(modal.expression(), &wait)?;
        Ok(())
    }

    /// Wait for the popin to close, then check it is not open
    pub fn popin_should_be_closed(&mut self, popin_id_suffix: &str) -> StepResult<()> {
        let wait = self.config.popin_wait();
        let modal = Selector::modal_by_id_suffix(popin_id_suffix);
        let ext = extended(&mut self.session, "popin_should_be_closed")?;
        tracing::debug!(%modal, "waiting for popin to close");
        ext.wait_for_css_invisible(modal.expression(), &wait)?;
        self.popin_should_not_be_opened(popin_id_suffix)
    }

    /// Pass when the popin is absent or hidden
    pub fn popin_should_not_be_opened(&mut self, popin_id_suffix: &str) -> StepResult<()> {
        let selector = Selector::popin(popin_id_suffix);
        tracing::debug!(%selector, "checking popin is not opened");
        if element_visible(&mut self.session, &selector)? == Some(true) {
            tracing::warn!(popin_id_suffix, "popin unexpectedly open");
            return Err(StepError::UnexpectedElementPresent {
                message: format!("Popin {} was found and opened", selector.expression()),
            });
        }
        Ok(())
    }

    /// Pass only when the popin is present and visible
    pub fn popin_should_be_opened(&mut self, popin_id_suffix: &str) -> StepResult<()> {
        let selector = Selector::popin(popin_id_suffix);
        tracing::debug!(%selector, "checking popin is opened");
        if element_visible(&mut self.session, &selector)? != Some(true) {
            tracing::warn!(popin_id_suffix, "popin not opened");
            return Err(StepError::ElementNotVisible {
                message: format!(
                    "Modal {} should be opened and visible",
                    selector.expression()
                ),
            });
        }
        Ok(())
    }

    /// Set the select2 widget `field` to the options labelled in `text_values`.
    ///
    /// Every label is resolved before the script runs, so a missing option
    /// leaves the widget untouched.
    pub fn fill_in_select2_field(&mut self, field: &str, text_values: &str) -> StepResult<()> {
        let mut values = Vec::new();
        for label in select2::split_labels(text_values) {
            let selector = Selector::select_option(field, label);
            tracing::debug!(%selector, "resolving select2 option");
            let option = self
                .session
                .find(&selector)?
                .ok_or_else(|| StepError::OptionNotFound {
                    field: field.to_string(),
                    label: label.to_string(),
                })?;
            // An option without a value attribute submits its text
            let value = self
                .session
                .attribute(&option, "value")?
                .unwrap_or_else(|| label.to_string());
            values.push(value);
        }
        let script = select2::change_script(field, &values)?;
        self.session.execute_script(&script)
    }

    fn require(&mut self, selector: &Selector, text: &str) -> StepResult<ElementRef> {
        tracing::debug!(%selector, "looking up element");
        self.session.find(selector)?.ok_or_else(|| {
            tracing::warn!(%selector, "element not found");
            StepError::ElementNotFound {
                selector: selector.to_string(),
                what: "text".to_string(),
                value: text.to_string(),
            }
        })
    }
}

fn extended<'a, S: BrowserSession>(
    session: &'a mut S,
    operation: &str,
) -> StepResult<&'a mut dyn ExtendedSession> {
    session.extended().ok_or_else(|| StepError::MissingCapability {
        capability: EXTENDED_CAPABILITY.to_string(),
        operation: operation.to_string(),
    })
}
