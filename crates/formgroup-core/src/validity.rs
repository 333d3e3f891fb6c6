#![forbid(unsafe_code)]

//! Validity flags and the ordered validity snapshot of a form control.
//!
//! A control can fail several constraints at once (a value may be both too
//! short and pattern-mismatched). [`ValidityState`] stores every failing
//! flag; [`ValidityState::first_failure`] picks the single one a user should
//! fix first.
//!
//! # Invariants
//!
//! 1. [`ValidityFlag::ALL`] is in declaration order and that order is the
//!    priority order. Iteration never depends on how a snapshot was built.
//! 2. A snapshot is valid iff no flag is set.
//! 3. `first_failure()` returns `None` exactly when the snapshot is valid.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseFlagError;

/// One kind of constraint violation.
///
/// Variant order is significant: it is the priority used when several flags
/// are set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ValidityFlag {
    /// Required but empty.
    ValueMissing,
    /// Longer than `maxlength`.
    TooLong,
    /// Shorter than `minlength` (non-empty values only).
    TooShort,
    /// Numeric value above `max`.
    RangeOverflow,
    /// Numeric value below `min`.
    RangeUnderflow,
    /// Value does not match the control's type (email, url).
    TypeMismatch,
    /// Value does not match `pattern`.
    PatternMismatch,
    /// Numeric value off the `step` grid.
    StepMismatch,
    /// Value could not be parsed for the control's type.
    BadInput,
    /// A custom validity message is set.
    CustomError,
}

impl ValidityFlag {
    /// Every flag, in priority order.
    pub const ALL: [Self; 10] = [
        Self::ValueMissing,
        Self::TooLong,
        Self::TooShort,
        Self::RangeOverflow,
        Self::RangeUnderflow,
        Self::TypeMismatch,
        Self::PatternMismatch,
        Self::StepMismatch,
        Self::BadInput,
        Self::CustomError,
    ];

    /// Flags that carry a user-facing message, in priority order.
    pub const MESSAGED: [Self; 7] = [
        Self::ValueMissing,
        Self::TooLong,
        Self::TooShort,
        Self::RangeOverflow,
        Self::RangeUnderflow,
        Self::TypeMismatch,
        Self::PatternMismatch,
    ];

    /// Kebab-case stem used for host attributes (`<stem>-message`).
    #[must_use]
    pub const fn attribute_stem(self) -> &'static str {
        match self {
            Self::ValueMissing => "value-missing",
            Self::TooLong => "too-long",
            Self::TooShort => "too-short",
            Self::RangeOverflow => "range-overflow",
            Self::RangeUnderflow => "range-underflow",
            Self::TypeMismatch => "type-mismatch",
            Self::PatternMismatch => "pattern-mismatch",
            Self::StepMismatch => "step-mismatch",
            Self::BadInput => "bad-input",
            Self::CustomError => "custom-error",
        }
    }

    /// Descriptive failure name.
    #[must_use]
    pub const fn failure_name(self) -> &'static str {
        match self {
            Self::ValueMissing => "required-but-empty",
            Self::TooLong => "too-long",
            Self::TooShort => "too-short",
            Self::RangeOverflow => "range-above-max",
            Self::RangeUnderflow => "range-below-min",
            Self::TypeMismatch => "wrong-format",
            Self::PatternMismatch => "pattern-mismatch",
            Self::StepMismatch => "step-mismatch",
            Self::BadInput => "bad-input",
            Self::CustomError => "custom-error",
        }
    }

    /// Whether a message can be configured (and a default exists) for this flag.
    #[must_use]
    pub const fn is_messaged(self) -> bool {
        !matches!(self, Self::StepMismatch | Self::BadInput | Self::CustomError)
    }

    const fn bit(self) -> ValidityState {
        match self {
            Self::ValueMissing => ValidityState::VALUE_MISSING,
            Self::TooLong => ValidityState::TOO_LONG,
            Self::TooShort => ValidityState::TOO_SHORT,
            Self::RangeOverflow => ValidityState::RANGE_OVERFLOW,
            Self::RangeUnderflow => ValidityState::RANGE_UNDERFLOW,
            Self::TypeMismatch => ValidityState::TYPE_MISMATCH,
            Self::PatternMismatch => ValidityState::PATTERN_MISMATCH,
            Self::StepMismatch => ValidityState::STEP_MISMATCH,
            Self::BadInput => ValidityState::BAD_INPUT,
            Self::CustomError => ValidityState::CUSTOM_ERROR,
        }
    }
}

impl fmt::Display for ValidityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_name())
    }
}

impl FromStr for ValidityFlag {
    type Err = ParseFlagError;

    /// Accepts either the attribute stem or the failure name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.attribute_stem() == s || flag.failure_name() == s)
            .ok_or_else(|| ParseFlagError {
                name: s.to_string(),
            })
    }
}

bitflags::bitflags! {
    /// Snapshot of a control's constraint failures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValidityState: u16 {
        const VALUE_MISSING    = 1 << 0;
        const TOO_LONG         = 1 << 1;
        const TOO_SHORT        = 1 << 2;
        const RANGE_OVERFLOW   = 1 << 3;
        const RANGE_UNDERFLOW  = 1 << 4;
        const TYPE_MISMATCH    = 1 << 5;
        const PATTERN_MISMATCH = 1 << 6;
        const STEP_MISMATCH    = 1 << 7;
        const BAD_INPUT        = 1 << 8;
        const CUSTOM_ERROR     = 1 << 9;
    }
}

impl Default for ValidityState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ValidityState {
    /// A snapshot with no failures.
    pub const VALID: Self = Self::empty();

    /// Build a snapshot from individual flags.
    #[must_use]
    pub fn from_flags(flags: impl IntoIterator<Item = ValidityFlag>) -> Self {
        flags
            .into_iter()
            .fold(Self::empty(), |state, flag| state | flag.bit())
    }

    /// True when no constraint fails.
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.is_empty()
    }

    /// Whether `flag` is set.
    #[inline]
    #[must_use]
    pub fn has(self, flag: ValidityFlag) -> bool {
        self.contains(flag.bit())
    }

    /// Set or clear one flag.
    pub fn set_flag(&mut self, flag: ValidityFlag, failing: bool) {
        self.set(flag.bit(), failing);
    }

    /// Failing flags in priority order.
    pub fn failures(self) -> impl Iterator<Item = ValidityFlag> {
        ValidityFlag::ALL
            .into_iter()
            .filter(move |flag| self.has(*flag))
    }

    /// The highest-priority failing flag, if any.
    #[must_use]
    pub fn first_failure(self) -> Option<ValidityFlag> {
        self.failures().next()
    }
}

impl FromIterator<ValidityFlag> for ValidityState {
    fn from_iter<I: IntoIterator<Item = ValidityFlag>>(iter: I) -> Self {
        Self::from_flags(iter)
    }
}
