#![forbid(unsafe_code)]

//! Failure messages: built-in defaults and per-instance overrides.
//!
//! Overrides come from host attributes named `<stem>-message` (for example
//! `pattern-mismatch-message`) or are set programmatically. An empty
//! override counts as absent. Flags without a default and without an
//! override resolve to no message.

use std::collections::BTreeMap;

use formgroup_core::ValidityFlag;

/// Suffix appended to a flag's attribute stem to name its override attribute.
pub const MESSAGE_ATTRIBUTE_SUFFIX: &str = "-message";

/// Built-in message for `flag`, if it has one.
#[must_use]
pub const fn default_message(flag: ValidityFlag) -> Option<&'static str> {
    match flag {
        ValidityFlag::ValueMissing => Some("This field is required"),
        ValidityFlag::TooLong => Some("This field is too long"),
        ValidityFlag::TooShort => Some("This field is too short"),
        ValidityFlag::RangeOverflow => Some("This field has a number that is too big"),
        ValidityFlag::RangeUnderflow => Some("This field has a number that is too small"),
        ValidityFlag::TypeMismatch => Some("This field is the wrong type"),
        ValidityFlag::PatternMismatch => Some("This fields value does not match the pattern"),
        ValidityFlag::StepMismatch | ValidityFlag::BadInput | ValidityFlag::CustomError => None,
    }
}

/// Host attribute that overrides the message for `flag`.
#[must_use]
pub fn attribute_name(flag: ValidityFlag) -> String {
    format!("{}{MESSAGE_ATTRIBUTE_SUFFIX}", flag.attribute_stem())
}

/// Per-instance message overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MessageConfig {
    overrides: BTreeMap<ValidityFlag, String>,
}

impl MessageConfig {
    /// No overrides: every flag uses its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides for the messaged flags from `<stem>-message` attributes.
    #[must_use]
    pub fn from_attributes<'a>(attr: impl Fn(&str) -> Option<&'a str>) -> Self {
        let overrides = ValidityFlag::MESSAGED
            .into_iter()
            .filter_map(|flag| {
                attr(&attribute_name(flag))
                    .filter(|text| !text.is_empty())
                    .map(|text| (flag, text.to_string()))
            })
            .collect();
        Self { overrides }
    }

    /// Set the override for `flag`.
    #[must_use]
    pub fn with_message(mut self, flag: ValidityFlag, text: impl Into<String>) -> Self {
        self.set_message(flag, text);
        self
    }

    /// Set the override for `flag`. An empty text removes it.
    pub fn set_message(&mut self, flag: ValidityFlag, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.overrides.remove(&flag);
        } else {
            self.overrides.insert(flag, text);
        }
    }

    /// The override for `flag`, without falling back.
    #[must_use]
    pub fn override_for(&self, flag: ValidityFlag) -> Option<&str> {
        self.overrides
            .get(&flag)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// The message to display for `flag`: the override if present, else the
    /// default, else nothing.
    #[must_use]
    pub fn resolve(&self, flag: ValidityFlag) -> Option<&str> {
        self.override_for(flag).or_else(|| default_message(flag))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
