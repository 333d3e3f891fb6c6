#![forbid(unsafe_code)]

//! Field validation widget for the formgroup host model.
//!
//! [`FormGroup`] wraps one form control and shows a single, prioritized
//! error message in a polite live region. See [`form_group`] for the
//! lifecycle and [`bridge`] for the three event reactions.

pub mod bridge;
pub mod error_message;
pub mod form_group;
pub mod messages;

pub use error_message::{Announcement, ErrorMessage, ErrorMessageStyle, Politeness};
pub use form_group::FormGroup;
pub use messages::{MessageConfig, attribute_name, default_message};
