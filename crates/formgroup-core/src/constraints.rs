#![forbid(unsafe_code)]

//! Constraint sets and their evaluation into a [`ValidityState`].
//!
//! Mirrors HTML constraint validation for single-line inputs and textareas:
//!
//! - `required` fails only on an empty value.
//! - Length limits count characters; `minlength` ignores empty values.
//! - `min`, `max` and `step` apply to numeric inputs. A numeric input whose
//!   value does not parse reports `BadInput` and skips range checks.
//! - `type` and `pattern` never fail an empty value. The pattern must match
//!   the whole value.
//!
//! Evaluation is pure: the same value and constraints always produce the
//! same snapshot.

use regex::Regex;

use crate::error::{ConstraintError, Result};
use crate::validity::{ValidityFlag, ValidityState};

const STEP_EPSILON: f64 = 1e-9;

/// The `type` of a control, as far as validation cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputType {
    #[default]
    Text,
    Email,
    Url,
    Number,
    /// A slider. Validated like `Number`.
    Range,
    /// A `<textarea>`: no type or pattern semantics.
    TextArea,
}

impl InputType {
    /// Parse a `type` attribute. Unknown types behave as text, as in HTML.
    #[must_use]
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "url" => Self::Url,
            "number" => Self::Number,
            "range" => Self::Range,
            _ => Self::Text,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }
}

/// Declared constraints of one control.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    input_type: InputType,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    pattern: Option<Regex>,
}

impl Constraints {
    /// No constraints on a control of the given type.
    #[must_use]
    pub fn new(input_type: InputType) -> Self {
        Self {
            input_type,
            ..Self::default()
        }
    }

    /// Read constraints from attribute lookups (`type`, `required`,
    /// `minlength`, `maxlength`, `min`, `max`, `step`, `pattern`).
    ///
    /// `textarea` controls ignore `type`, `min`, `max`, `step` and `pattern`.
    pub fn from_attributes<'a>(
        tag: &str,
        attr: impl Fn(&str) -> Option<&'a str>,
    ) -> Result<Self> {
        let textarea = tag.eq_ignore_ascii_case("textarea");
        let input_type = if textarea {
            InputType::TextArea
        } else {
            attr("type").map(InputType::from_attribute).unwrap_or_default()
        };

        let mut constraints = Self::new(input_type).required(attr("required").is_some());
        if let Some(raw) = attr("minlength") {
            constraints = constraints.min_length(parse_length("minlength", raw)?);
        }
        if let Some(raw) = attr("maxlength") {
            constraints = constraints.max_length(parse_length("maxlength", raw)?);
        }
        if let (Some(min), Some(max)) = (constraints.min_length, constraints.max_length) {
            if min > max {
                return Err(ConstraintError::LengthBounds { min, max });
            }
        }
        if textarea {
            return Ok(constraints);
        }

        if let Some(raw) = attr("min") {
            constraints = constraints.min(parse_number("min", raw)?);
        }
        if let Some(raw) = attr("max") {
            constraints = constraints.max(parse_number("max", raw)?);
        }
        if let Some(raw) = attr("step").filter(|raw| !raw.trim().eq_ignore_ascii_case("any")) {
            constraints = constraints.step(parse_number("step", raw)?)?;
        }
        if let Some(raw) = attr("pattern") {
            constraints = constraints.pattern(raw)?;
        }
        Ok(constraints)
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn min_length(mut self, chars: usize) -> Self {
        self.min_length = Some(chars);
        self
    }

    #[must_use]
    pub fn max_length(mut self, chars: usize) -> Self {
        self.max_length = Some(chars);
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the step granularity. Must be positive.
    pub fn step(mut self, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ConstraintError::Step(step));
        }
        self.step = Some(step);
        Ok(self)
    }

    /// Set a pattern. It is matched against the whole value.
    pub fn pattern(mut self, pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| ConstraintError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Compute the validity snapshot for `value`.
    ///
    /// A non-empty `custom_validity` message sets `CustomError`.
    #[must_use]
    pub fn evaluate(&self, value: &str, custom_validity: &str) -> ValidityState {
        let mut state = ValidityState::VALID;
        let empty = value.is_empty();

        state.set_flag(ValidityFlag::ValueMissing, self.required && empty);

        let chars = value.chars().count();
        if let Some(max) = self.max_length {
            state.set_flag(ValidityFlag::TooLong, chars > max);
        }
        if let Some(min) = self.min_length {
            state.set_flag(ValidityFlag::TooShort, !empty && chars < min);
        }

        if !empty {
            match self.input_type {
                InputType::Number | InputType::Range => self.evaluate_number(value, &mut state),
                InputType::Email => {
                    state.set_flag(ValidityFlag::TypeMismatch, !is_email(value));
                }
                InputType::Url => {
                    state.set_flag(ValidityFlag::TypeMismatch, !is_url(value));
                }
                InputType::Text | InputType::TextArea => {}
            }
            if let Some(pattern) = self.pattern.as_ref().filter(|_| !self.input_type.is_numeric()) {
                state.set_flag(ValidityFlag::PatternMismatch, !pattern.is_match(value));
            }
        }

        state.set_flag(ValidityFlag::CustomError, !custom_validity.is_empty());

        tracing::trace!(
            message = "constraints.evaluate",
            chars,
            failures = state.bits()
        );
        state
    }

    fn evaluate_number(&self, value: &str, state: &mut ValidityState) {
        let Some(number) = parse_float(value) else {
            state.set_flag(ValidityFlag::BadInput, true);
            return;
        };
        if let Some(max) = self.max {
            state.set_flag(ValidityFlag::RangeOverflow, number > max);
        }
        if let Some(min) = self.min {
            state.set_flag(ValidityFlag::RangeUnderflow, number < min);
        }
        if let Some(step) = self.step {
            let base = self.min.unwrap_or(0.0);
            let steps = (number - base) / step;
            let off_grid = (steps - steps.round()).abs() > STEP_EPSILON;
            state.set_flag(ValidityFlag::StepMismatch, off_grid);
        }
    }
}

/// A finite float with no surrounding whitespace.
fn parse_float(raw: &str) -> Option<f64> {
    if raw.trim() != raw {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_number(attribute: &'static str, raw: &str) -> Result<f64> {
    parse_float(raw.trim()).ok_or_else(|| ConstraintError::not_a_number(attribute, raw))
}

fn parse_length(attribute: &'static str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConstraintError::not_a_length(attribute, raw))
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn is_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };
    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && !rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NONE: Vec<ValidityFlag> = Vec::new();

    fn failures(constraints: &Constraints, value: &str) -> Vec<ValidityFlag> {
        constraints.evaluate(value, "").failures().collect()
    }

    #[test]
    fn required_only_fails_empty() {
        let c = Constraints::new(InputType::Text).required(true);
        assert_eq!(failures(&c, ""), vec![ValidityFlag::ValueMissing]);
        assert_eq!(failures(&c, "x"), NONE);
    }

    #[test]
    fn lengths_count_chars_and_ignore_empty_for_min() {
        let c = Constraints::new(InputType::Text).min_length(3).max_length(4);
        assert_eq!(failures(&c, ""), NONE);
        assert_eq!(failures(&c, "ab"), vec![ValidityFlag::TooShort]);
        assert_eq!(failures(&c, "äöü"), NONE);
        assert_eq!(failures(&c, "abcde"), vec![ValidityFlag::TooLong]);
    }

    #[test]
    fn pattern_matches_whole_value() {
        let c = Constraints::new(InputType::Text).pattern("[0-9]+").unwrap();
        assert_eq!(failures(&c, "123"), NONE);
        assert_eq!(failures(&c, "12a"), vec![ValidityFlag::PatternMismatch]);
        assert_eq!(failures(&c, "a12"), vec![ValidityFlag::PatternMismatch]);
        assert_eq!(failures(&c, ""), NONE);
    }

    #[test]
    fn pattern_alternation_is_grouped() {
        let c = Constraints::new(InputType::Text).pattern("a|b").unwrap();
        assert_eq!(failures(&c, "ab"), vec![ValidityFlag::PatternMismatch]);
        assert_eq!(failures(&c, "b"), NONE);
    }

    #[test]
    fn short_and_mismatched_reports_both() {
        let c = Constraints::new(InputType::Text)
            .min_length(5)
            .pattern("[0-9]*")
            .unwrap();
        assert_eq!(
            failures(&c, "ab"),
            vec![ValidityFlag::TooShort, ValidityFlag::PatternMismatch]
        );
    }

    #[test]
    fn number_range_and_step() {
        let c = Constraints::new(InputType::Number)
            .min(1.0)
            .max(10.0)
            .step(0.5)
            .unwrap();
        assert_eq!(failures(&c, "5.5"), NONE);
        assert_eq!(failures(&c, "11"), vec![ValidityFlag::RangeOverflow]);
        assert_eq!(failures(&c, "0"), vec![ValidityFlag::RangeUnderflow]);
        assert_eq!(failures(&c, "1.2"), vec![ValidityFlag::StepMismatch]);
        assert_eq!(failures(&c, "abc"), vec![ValidityFlag::BadInput]);
        assert_eq!(failures(&c, " 3"), vec![ValidityFlag::BadInput]);
    }

    #[test]
    fn range_type_checks_bounds_and_step() {
        let attrs = [("type", "range"), ("min", "0"), ("max", "5"), ("step", "1")];
        let lookup = |name: &str| attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
        let c = Constraints::from_attributes("input", lookup).unwrap();
        assert_eq!(c.input_type(), InputType::Range);
        assert!(c.input_type().is_numeric());
        assert_eq!(failures(&c, "3"), NONE);
        assert_eq!(failures(&c, "9"), vec![ValidityFlag::RangeOverflow]);
        assert_eq!(failures(&c, "-1"), vec![ValidityFlag::RangeUnderflow]);
        assert_eq!(failures(&c, "2.5"), vec![ValidityFlag::StepMismatch]);
    }

    #[test]
    fn email_and_url_types() {
        let email = Constraints::new(InputType::Email);
        assert_eq!(failures(&email, "a@b.c"), NONE);
        assert_eq!(failures(&email, "nope"), vec![ValidityFlag::TypeMismatch]);
        assert_eq!(failures(&email, "a@@b"), vec![ValidityFlag::TypeMismatch]);
        assert_eq!(failures(&email, ""), NONE);

        let url = Constraints::new(InputType::Url);
        assert_eq!(failures(&url, "https://example.com"), NONE);
        assert_eq!(failures(&url, "mailto:x"), NONE);
        assert_eq!(failures(&url, "example.com"), vec![ValidityFlag::TypeMismatch]);
        assert_eq!(failures(&url, "1http://x"), vec![ValidityFlag::TypeMismatch]);
    }

    #[test]
    fn custom_validity_sets_custom_error() {
        let c = Constraints::new(InputType::Text);
        let state = c.evaluate("fine", "taken");
        assert_eq!(state.first_failure(), Some(ValidityFlag::CustomError));
    }

    #[test]
    fn from_attributes_reads_html_names() {
        let attrs = [
            ("type", "number"),
            ("required", ""),
            ("min", "2"),
            ("max", "4"),
            ("step", "any"),
        ];
        let lookup = |name: &str| attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
        let c = Constraints::from_attributes("input", lookup).unwrap();
        assert_eq!(c.input_type(), InputType::Number);
        assert!(c.is_required());
        assert_eq!(failures(&c, "5"), vec![ValidityFlag::RangeOverflow]);
        assert_eq!(failures(&c, "2.75"), NONE);
    }

    #[test]
    fn textarea_ignores_type_and_pattern() {
        let attrs = [("type", "email"), ("pattern", "x"), ("maxlength", "3")];
        let lookup = |name: &str| attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
        let c = Constraints::from_attributes("TEXTAREA", lookup).unwrap();
        assert_eq!(c.input_type(), InputType::TextArea);
        assert_eq!(failures(&c, "abc"), NONE);
        assert_eq!(failures(&c, "abcd"), vec![ValidityFlag::TooLong]);
    }

    #[test]
    fn bad_attributes_are_errors() {
        let lookup = |name: &str| (name == "pattern").then_some("(");
        assert!(matches!(
            Constraints::from_attributes("input", lookup),
            Err(ConstraintError::Pattern { .. })
        ));

        let lookup = |name: &str| (name == "min").then_some("low");
        assert!(matches!(
            Constraints::from_attributes("input", lookup),
            Err(ConstraintError::NotANumber { attribute: "min", .. })
        ));

        let lookup = |name: &str| match name {
            "minlength" => Some("5"),
            "maxlength" => Some("2"),
            _ => None,
        };
        assert!(matches!(
            Constraints::from_attributes("input", lookup),
            Err(ConstraintError::LengthBounds { min: 5, max: 2 })
        ));

        assert!(matches!(
            Constraints::new(InputType::Number).step(0.0),
            Err(ConstraintError::Step(_))
        ));
    }
}
