//! Scenario tests: whole step sequences against an in-memory admin page.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use admin_steps::{
    AdminSteps, BrowserSession, ExtendedSession, MockElement, MockSession, Selector, SessionCall,
    StepError, StepsConfig,
};
use proptest::prelude::*;

fn fast_config() -> StepsConfig {
    StepsConfig::default()
        .with_popin_timeout(100)
        .with_poll_interval(5)
}

/// A user list page: side menu, navbar actions, a delete confirmation popin
/// and a tag picker.
fn user_list_page() -> MockSession {
    let delete_button = Selector::css("a.delete-link");
    let cancel_button = Selector::css("#delete_confirm button.cancel");
    let modal_wait = Selector::modal_by_id_suffix("delete_confirm");
    let modal = Selector::popin("delete_confirm");

    MockSession::new()
        .with_extended()
        .with_element(Selector::menu_item("Users"), MockElement::visible())
        .with_element(Selector::navbar_action("Add new"), MockElement::visible())
        .with_element(Selector::navbar_action("Export"), MockElement::hidden())
        .with_element(delete_button.clone(), MockElement::visible())
        .with_element(cancel_button.clone(), MockElement::visible())
        .with_element(modal_wait.clone(), MockElement::hidden())
        .with_element(modal.clone(), MockElement::hidden())
        .on_click_show(delete_button.clone(), modal_wait.clone())
        .on_click_show(delete_button, modal.clone())
        .on_click_hide(cancel_button.clone(), modal_wait)
        .on_click_hide(cancel_button, modal)
        .with_element(Selector::select_option("user_tags", "Red"), MockElement::option("1"))
        .with_element(Selector::select_option("user_tags", "Green"), MockElement::option("2"))
        .with_element(Selector::select_option("user_tags", "Blue"), MockElement::option("3"))
}

#[test]
fn test_full_admin_scenario() {
    let mut admin = AdminSteps::with_config(user_list_page(), fast_config());

    admin.login("admin", "admin").unwrap();
    for step in [
        "Given I open the menu \"Users\"",
        "Then I should see \"Add new\" action in navbar",
        "And I should not see \"Delete all\" action in navbar",
        "And the popin \"delete_confirm\" should not be opened",
        "When clicking on the \"a.delete-link\" element should open a popin \"delete_confirm\"",
        "Then the popin \"delete_confirm\" should be opened",
        "When I set the select2 field \"user_tags\" to \"Red, Blue\"",
    ] {
        admin
            .run_step(step)
            .unwrap_or_else(|e| panic!("step `{step}` failed: {e}"));
    }

    admin
        .session_mut()
        .extended()
        .unwrap()
        .click_element("#delete_confirm button.cancel")
        .unwrap();
    admin
        .run_step("Then the popin \"delete_confirm\" should be closed")
        .unwrap();

    let session = admin.into_session();
    assert_eq!(
        session.scripts(),
        vec!["jQuery('#' + CSS.escape(\"user_tags\")).val([\"1\",\"3\"]).trigger('change');"]
    );
}

#[test]
fn test_hidden_navbar_action_is_present_but_not_visible() {
    let mut admin = AdminSteps::with_config(user_list_page(), fast_config());
    let err = admin
        .run_step("I should see \"Export\" action in navbar")
        .unwrap_err();
    assert!(matches!(err, StepError::ElementNotVisible { .. }));

    let err = admin
        .run_step("I should not see \"Export\" action in navbar")
        .unwrap_err();
    assert!(matches!(err, StepError::UnexpectedElementPresent { .. }));
}

#[test]
fn test_login_order_is_fixed() {
    let mut admin = AdminSteps::new(MockSession::new());
    admin.login("nobody", "wrong").unwrap();
    let kinds: Vec<&str> = admin
        .session()
        .calls()
        .iter()
        .map(|c| match c {
            SessionCall::VisitPath(_) => "visit",
            SessionCall::FillField { .. } => "fill",
            SessionCall::PressButton(_) => "press",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["visit", "fill", "fill", "press"]);
}

#[test]
fn test_popin_never_opening_times_out() {
    let session = MockSession::new()
        .with_extended()
        .with_element(Selector::css("#broken"), MockElement::visible())
        .with_element(Selector::modal_by_id_suffix("edit"), MockElement::hidden());
    let mut admin = AdminSteps::with_config(session, fast_config());
    let err = admin
        .clicking_on_element_should_open_popin("#broken", "edit")
        .unwrap_err();
    assert!(matches!(err, StepError::Timeout { ms: 100, .. }));
}

#[test]
fn test_slow_popin_opens_within_timeout() {
    let session = MockSession::new()
        .with_extended()
        .with_element(Selector::css("#slow"), MockElement::visible())
        .with_element(
            Selector::modal_by_id_suffix("edit"),
            MockElement::hidden().visible_after(3),
        );
    let mut admin = AdminSteps::with_config(session, fast_config());
    admin
        .clicking_on_element_should_open_popin("#slow", "edit")
        .unwrap();
}

#[test]
fn test_missing_capability_performs_no_click() {
    let session = MockSession::new().with_element(Selector::css("#x"), MockElement::visible());
    let mut admin = AdminSteps::with_config(session, fast_config());
    let err = admin
        .clicking_on_element_should_open_popin("#x", "edit")
        .unwrap_err();
    assert!(matches!(err, StepError::MissingCapability { .. }));
    assert_eq!(admin.session().click_count(), 0);
}

#[test]
fn test_borrowed_session() {
    let mut session = user_list_page();
    {
        let mut admin = AdminSteps::with_config(&mut session, fast_config());
        admin.open_menu_item_by_text("Users").unwrap();
        admin.popin_should_be_closed("delete_confirm").unwrap();
    }
    assert_eq!(session.click_count(), 1);
}

proptest! {
    #[test]
    fn prop_navbar_see_iff_visible(text in "[A-Za-z][A-Za-z '\"]{0,12}", visible in any::<bool>()) {
        let element = if visible { MockElement::visible() } else { MockElement::hidden() };
        let build = || AdminSteps::new(
            MockSession::new().with_element(Selector::navbar_action(&text), element.clone()),
        );
        prop_assert_eq!(build().should_see_action_in_navbar(&text).is_ok(), visible);
        prop_assert!(build().should_not_see_action_in_navbar(&text).is_err());
    }

    #[test]
    fn prop_popin_states_exclusive(suffix in "[a-z_]{1,10}", state in 0u8..3) {
        let build = || {
            let session = MockSession::new();
            let session = match state {
                0 => session,
                1 => session.with_element(Selector::popin(&suffix), MockElement::hidden()),
                _ => session.with_element(Selector::popin(&suffix), MockElement::visible()),
            };
            AdminSteps::new(session)
        };
        let opened = build().popin_should_be_opened(&suffix).is_ok();
        let not_opened = build().popin_should_not_be_opened(&suffix).is_ok();
        prop_assert!(opened != not_opened);
        prop_assert_eq!(opened, state == 2);
    }
}
