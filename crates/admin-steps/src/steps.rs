//! Phrase routing from step text to [`AdminSteps`] operations.
//!
//! Step text may start with a Gherkin keyword (`Given`, `When`, `Then`,
//! `And`, `But`), which is ignored. Quoted arguments of the select2 phrases
//! may contain `\"`.

use crate::admin::AdminSteps;
use crate::result::{StepError, StepResult};
use crate::session::BrowserSession;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// A parsed step phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `I open the menu "<text>"`
    OpenMenu {
        /// Menu entry text
        text: String,
    },
    /// `I should see "<text>" action in navbar`
    SeeNavbarAction {
        /// Link text
        text: String,
    },
    /// `I should not see "<text>" action in navbar`
    NotSeeNavbarAction {
        /// Link text
        text: String,
    },
    /// `I click on "<text>" action in navbar`
    ClickNavbarAction {
        /// Link text
        text: String,
    },
    /// `clicking on the "<el>" element should open a popin "<id>"`
    ClickOpensPopin {
        /// CSS selector of the element to click
        element: String,
        /// Popin id suffix
        popin: String,
    },
    /// `the popin "<id>" should be closed`
    PopinClosed {
        /// Popin id suffix
        popin: String,
    },
    /// `the popin "<id>" should not be opened`
    PopinNotOpened {
        /// Popin id suffix
        popin: String,
    },
    /// `the popin "<id>" should be opened`
    PopinOpened {
        /// Popin id suffix
        popin: String,
    },
    /// `set the select2 field "<field>" to "<values>"` or
    /// `set the select2 value "<values>" for "<field>"`
    FillSelect2 {
        /// Select element id
        field: String,
        /// Comma separated option labels
        values: String,
    },
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    OpenMenu,
    SeeNavbarAction,
    NotSeeNavbarAction,
    ClickNavbarAction,
    ClickOpensPopin,
    PopinClosed,
    PopinNotOpened,
    PopinOpened,
    Select2FieldTo,
    Select2ValueFor,
}

const PATTERNS: [(Kind, &str); 10] = [
    (Kind::OpenMenu, r#"^I open the menu "([^"]*)"$"#),
    (Kind::SeeNavbarAction, r#"^I should see "([^"]*)" action in navbar$"#),
    (Kind::NotSeeNavbarAction, r#"^I should not see "([^"]*)" action in navbar$"#),
    (Kind::ClickNavbarAction, r#"^I click on "([^"]*)" action in navbar$"#),
    (
        Kind::ClickOpensPopin,
        r#"^clicking on the "([^"]*)" element should open a popin "([^"]*)"$"#,
    ),
    (Kind::PopinClosed, r#"^the popin "([^"]*)" should be closed$"#),
    (Kind::PopinNotOpened, r#"^the popin "([^"]*)" should not be opened$"#),
    (Kind::PopinOpened, r#"^the popin "([^"]*)" should be opened$"#),
    (
        Kind::Select2FieldTo,
        r#"^(?:I )?set the select2 field "(?P<field>(?:[^"]|\\")*)" to "(?P<values>(?:[^"]|\\")*)"$"#,
    ),
    (
        Kind::Select2ValueFor,
        r#"^(?:I )?set the select2 value "(?P<values>(?:[^"]|\\")*)" for "(?P<field>(?:[^"]|\\")*)"$"#,
    ),
];

fn compiled() -> &'static [(Kind, Regex)] {
    static COMPILED: OnceLock<Vec<(Kind, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(kind, pattern)| (*kind, Regex::new(pattern).expect("valid step pattern")))
            .collect()
    })
}

fn keyword() -> &'static Regex {
    static KEYWORD: OnceLock<Regex> = OnceLock::new();
    KEYWORD.get_or_init(|| {
        Regex::new(r"^(?:Given|When|Then|And|But)\s+").expect("valid keyword pattern")
    })
}

fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index).map_or_else(String::new, |m| m.as_str().to_string())
}

fn named(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map_or_else(String::new, |m| m.as_str().replace("\\\"", "\""))
}

impl Step {
    /// Parse step text into a [`Step`]
    pub fn parse(text: &str) -> StepResult<Self> {
        let trimmed = text.trim();
        let phrase = keyword().replace(trimmed, "");
        for (kind, regex) in compiled() {
            if let Some(caps) = regex.captures(&phrase) {
                return Ok(Self::from_captures(*kind, &caps));
            }
        }
        Err(StepError::UnknownStep {
            text: trimmed.to_string(),
        })
    }

    fn from_captures(kind: Kind, caps: &Captures<'_>) -> Self {
        match kind {
            Kind::OpenMenu => Self::OpenMenu {
                text: group(caps, 1),
            },
            Kind::SeeNavbarAction => Self::SeeNavbarAction {
                text: group(caps, 1),
            },
            Kind::NotSeeNavbarAction => Self::NotSeeNavbarAction {
                text: group(caps, 1),
            },
            Kind::ClickNavbarAction => Self::ClickNavbarAction {
                text: group(caps, 1),
            },
            Kind::ClickOpensPopin => Self::ClickOpensPopin {
                element: group(caps, 1),
                popin: group(caps, 2),
            },
            Kind::PopinClosed => Self::PopinClosed {
                popin: group(caps, 1),
            },
            Kind::PopinNotOpened => Self::PopinNotOpened {
                popin: group(caps, 1),
            },
            Kind::PopinOpened => Self::PopinOpened {
                popin: group(caps, 1),
            },
            Kind::Select2FieldTo | Kind::Select2ValueFor => Self::FillSelect2 {
                field: named(caps, "field"),
                values: named(caps, "values"),
            },
        }
    }

    /// Every phrase pattern, in matching order
    #[must_use]
    pub fn patterns() -> Vec<&'static str> {
        PATTERNS.iter().map(|(_, p)| *p).collect()
    }

    /// Run the step against `steps`
    pub fn run<S: BrowserSession>(&self, steps: &mut AdminSteps<S>) -> StepResult<()> {
        tracing::debug!(step = %self, "running step");
        match self {
            Self::OpenMenu { text } => steps.open_menu_item_by_text(text),
            Self::SeeNavbarAction { text } => steps.should_see_action_in_navbar(text),
            Self::NotSeeNavbarAction { text } => steps.should_not_see_action_in_navbar(text),
            Self::ClickNavbarAction { text } => steps.click_on_action_in_navbar(text),
            Self::ClickOpensPopin { element, popin } => {
                steps.clicking_on_element_should_open_popin(element, popin)
            }
            Self::PopinClosed { popin } => steps.popin_should_be_closed(popin),
            Self::PopinNotOpened { popin } => steps.popin_should_not_be_opened(popin),
            Self::PopinOpened { popin } => steps.popin_should_be_opened(popin),
            Self::FillSelect2 { field, values } => steps.fill_in_select2_field(field, values),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenMenu { text } => write!(f, "I open the menu \"{text}\""),
            Self::SeeNavbarAction { text } => write!(f, "I should see \"{text}\" action in navbar"),
            Self::NotSeeNavbarAction { text } => {
                write!(f, "I should not see \"{text}\" action in navbar")
            }
            Self::ClickNavbarAction { text } => write!(f, "I click on \"{text}\" action in navbar"),
            Self::ClickOpensPopin { element, popin } => write!(
                f,
                "clicking on the \"{element}\" element should open a popin \"{popin}\""
            ),
            Self::PopinClosed { popin } => write!(f, "the popin \"{popin}\" should be closed"),
            Self::PopinNotOpened { popin } => write!(f, "the popin \"{popin}\" should not be opened"),
            Self::PopinOpened { popin } => write!(f, "the popin \"{popin}\" should be opened"),
            Self::FillSelect2 { field, values } => write!(
                f,
                "I set the select2 field \"{}\" to \"{}\"",
                field.replace('"', "\\\""),
                values.replace('"', "\\\"")
            ),
        }
    }
}

impl<S: BrowserSession> AdminSteps<S> {
    /// Parse and run one step phrase
    pub fn run_step(&mut self, text: &str) -> StepResult<()> {
        Step::parse(text)?.run(self)
    }
}
