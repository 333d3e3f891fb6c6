#![forbid(unsafe_code)]

//! The error message region.
//!
//! One always-present region whose text is either empty or exactly one
//! message. It is a polite live region: each change to a non-empty text is
//! queued as an [`Announcement`] for assistive technology, after whatever
//! is currently being spoken. An empty region collapses to no space.
//!
//! # Styling
//!
//! - Custom property [`COLOR_PROPERTY`] sets the message color, defaulting
//!   to [`DEFAULT_COLOR`].
//! - The element is exposed as part [`PART`] for full external styling.

use std::collections::VecDeque;
use std::fmt;

/// Class name of the region element.
pub const CLASS: &str = "error-message";
/// Exposed part name of the region element.
pub const PART: &str = "error-message";
/// Custom property controlling the message color.
pub const COLOR_PROPERTY: &str = "--error-message-color";
/// Color used when [`COLOR_PROPERTY`] is unset.
pub const DEFAULT_COLOR: &str = "hsl(0, 66%, 54%)";

/// Stylesheet adopted by the component's shadow root.
pub const STYLESHEET: &str = "\
.error-message {
  color: var(--error-message-color, hsl(0, 66%, 54%));
}

.error-message:empty {
  display: none;
}
";

/// Announcements kept for [`ErrorMessage::take_announcements`]. The oldest
/// is dropped first.
pub const MAX_PENDING_ANNOUNCEMENTS: usize = 16;

/// `aria-live` level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Politeness {
    Off,
    /// Announce after current speech.
    #[default]
    Polite,
    /// Interrupt current speech.
    Assertive,
}

impl Politeness {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

impl fmt::Display for Politeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued live-region announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Monotonic per region, starting at 1.
    pub seq: u64,
    pub politeness: Politeness,
    pub text: String,
}

/// Resolved style of the region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessageStyle {
    color: Option<String>,
}

impl ErrorMessageStyle {
    /// Style with the color custom property set to `color`. Blank values
    /// behave as unset.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        self.color = (!color.trim().is_empty()).then_some(color);
        self
    }

    /// Read [`COLOR_PROPERTY`] from an inline `style` attribute. The last
    /// declaration wins, as in CSS.
    #[must_use]
    pub fn from_inline(style: &str) -> Self {
        style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .filter(|(name, _)| name.trim() == COLOR_PROPERTY)
            .fold(Self::default(), |acc, (_, value)| acc.with_color(value.trim()))
    }

    /// The effective message color.
    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Inline declaration for the host, e.g. `--error-message-color: blue;`.
    /// Empty when unset.
    #[must_use]
    pub fn host_declaration(&self) -> String {
        self.color
            .as_deref()
            .map(|c| format!("{COLOR_PROPERTY}: {c};"))
            .unwrap_or_default()
    }
}

/// The presentation region.
#[derive(Debug, Clone, Default)]
pub struct ErrorMessage {
    text: String,
    politeness: Politeness,
    pending: VecDeque<Announcement>,
    last_seq: u64,
}

impl ErrorMessage {
    /// An empty polite region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_politeness(mut self, politeness: Politeness) -> Self {
        self.politeness = politeness;
        self
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the region takes no space (`:empty { display: none }`).
    #[inline]
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.is_empty()
    }

    #[must_use]
    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    /// Replace the text with `message`. Returns whether the text changed.
    /// A changed, non-empty text is announced unless politeness is `Off`.
    pub fn show(&mut self, message: &str) -> bool {
        if self.text == message {
            return false;
        }
        self.text.clear();
        self.text.push_str(message);
        if !message.is_empty() && self.politeness != Politeness::Off {
            self.last_seq += 1;
            if self.pending.len() == MAX_PENDING_ANNOUNCEMENTS {
                self.pending.pop_front();
            }
            self.pending.push_back(Announcement {
                seq: self.last_seq,
                politeness: self.politeness,
                text: message.to_string(),
            });
        }
        true
    }

    /// Empty the region. Returns whether it held text.
    pub fn clear(&mut self) -> bool {
        self.show("")
    }

    /// Number of announcements not yet taken, at most
    /// [`MAX_PENDING_ANNOUNCEMENTS`].
    #[must_use]
    pub fn pending_announcements(&self) -> usize {
        self.pending.len()
    }

    /// Drain queued announcements, oldest first.
    pub fn take_announcements(&mut self) -> Vec<Announcement> {
        self.pending.drain(..).collect()
    }

    /// Markup of the region element with the current text escaped.
    #[must_use]
    pub fn render_html(&self) -> String {
        format!(
            r#"<span class="{CLASS}" aria-live="{}" part="{PART}">{}</span>"#,
            self.politeness,
            v_htmlescape::escape(&self.text)
        )
    }
}
