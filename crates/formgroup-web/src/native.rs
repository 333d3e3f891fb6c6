#![forbid(unsafe_code)]

//! Platform validity snapshots and message selection.
//!
//! The browser exposes validity as ten independent booleans. They are
//! folded into a [`ValidityState`] so the priority rules stay in one place.

use formgroup_core::{ValidityFlag, ValidityState};
use formgroup_widgets::{MessageConfig, attribute_name};

/// One read of a control's platform `ValidityState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeValidity {
    pub value_missing: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_overflow: bool,
    pub range_underflow: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl NativeValidity {
    #[must_use]
    pub fn get(&self, flag: ValidityFlag) -> bool {
        match flag {
            ValidityFlag::ValueMissing => self.value_missing,
            ValidityFlag::TooLong => self.too_long,
            ValidityFlag::TooShort => self.too_short,
            ValidityFlag::RangeOverflow => self.range_overflow,
            ValidityFlag::RangeUnderflow => self.range_underflow,
            ValidityFlag::TypeMismatch => self.type_mismatch,
            ValidityFlag::PatternMismatch => self.pattern_mismatch,
            ValidityFlag::StepMismatch => self.step_mismatch,
            ValidityFlag::BadInput => self.bad_input,
            ValidityFlag::CustomError => self.custom_error,
        }
    }
}

impl From<NativeValidity> for ValidityState {
    fn from(native: NativeValidity) -> Self {
        ValidityFlag::ALL
            .into_iter()
            .filter(|&flag| native.get(flag))
            .collect()
    }
}

/// Message for the highest-priority failure in `state`, with overrides read
/// through `attr` (a host attribute lookup).
///
/// `None` when the state is valid or the first failure has no message.
#[must_use]
pub fn select_message(
    state: ValidityState,
    attr: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let flag = state.first_failure()?;
    let mut config = MessageConfig::new();
    if let Some(text) = attr(&attribute_name(flag)) {
        config.set_message(flag, text);
    }
    config.resolve(flag).map(str::to_owned)
}
