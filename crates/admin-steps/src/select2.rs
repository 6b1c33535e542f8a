//! Select2 multi-value widget support.
//!
//! Select2 hides the native `<select>`, so values are set through jQuery and a
//! `change` event is triggered for the widget to redraw.

use crate::result::StepResult;
use crate::selector::js_string;
use regex::Regex;
use std::sync::OnceLock;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r",\s*").expect("valid separator regex"))
}

/// Split `"Red, Blue,Green"` into option labels.
///
/// Only whitespace after a comma is dropped, so labels keep leading or
/// trailing spaces of the input as a whole.
#[must_use]
pub fn split_labels(text_values: &str) -> Vec<&str> {
    separator().split(text_values).collect()
}

/// Script setting the widget with id `field` to `values` and notifying it
pub fn change_script(field: &str, values: &[String]) -> StepResult<String> {
    let values = serde_json::to_string(values)?;
    Ok(format!(
        "jQuery('#' + CSS.escape({})).val({values}).trigger('change');",
        js_string(field)
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_labels() {
        assert_eq!(split_labels("Red, Blue"), vec!["Red", "Blue"]);
        assert_eq!(split_labels("Red,Blue,  Green"), vec!["Red", "Blue", "Green"]);
        assert_eq!(split_labels("Red"), vec!["Red"]);
    }

    #[test]
    fn test_split_keeps_inner_spaces() {
        assert_eq!(split_labels("Dark red, Light blue"), vec!["Dark red", "Light blue"]);
    }

    #[test]
    fn test_change_script() {
        let script = change_script("tags", &["1".to_string(), "3".to_string()]).unwrap();
        assert_eq!(
            script,
            "jQuery('#' + CSS.escape(\"tags\")).val([\"1\",\"3\"]).trigger('change');"
        );
    }

    #[test]
    fn test_change_script_escapes_field() {
        let script = change_script("a'b", &[]).unwrap();
        assert!(script.contains("CSS.escape(\"a'b\")"));
        assert!(script.contains(".val([])"));
    }

    proptest! {
        #[test]
        fn prop_split_roundtrips_labels(labels in prop::collection::vec("[A-Za-z0-9][A-Za-z0-9 ]{0,8}[A-Za-z0-9]", 1..6)) {
            let joined = labels.join(", ");
            let split = split_labels(&joined);
            prop_assert_eq!(split, labels.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
