#![forbid(unsafe_code)]

//! Control lifecycle signals.
//!
//! Only the three signals a field validator reacts to are modelled. Each
//! event is dispatched synchronously to every listener of its kind.

use std::fmt;

/// The kind of signal a control emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlEventKind {
    /// Native validation failed (typically on a submit attempt). Cancelable.
    Invalid,
    /// The value changed through user editing.
    Input,
    /// The control lost focus.
    Blur,
}

impl ControlEventKind {
    pub const ALL: [Self; 3] = [Self::Invalid, Self::Input, Self::Blur];

    /// DOM event type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Input => "input",
            Self::Blur => "blur",
        }
    }

    /// Whether listeners may cancel the default action.
    #[must_use]
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::Invalid)
    }
}

impl fmt::Display for ControlEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    kind: ControlEventKind,
    default_prevented: bool,
}

impl ControlEvent {
    #[must_use]
    pub fn new(kind: ControlEventKind) -> Self {
        Self {
            kind,
            default_prevented: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ControlEventKind {
        self.kind
    }

    /// Suppress the default action. Ignored for non-cancelable kinds.
    pub fn prevent_default(&mut self) {
        if self.kind.is_cancelable() {
            self.default_prevented = true;
        }
    }

    #[inline]
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
