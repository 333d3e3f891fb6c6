#![forbid(unsafe_code)]

//! Core: validity flags, constraint evaluation, and control event kinds.

pub mod constraints;
pub mod error;
pub mod event;
pub mod validity;

pub use constraints::{Constraints, InputType};
pub use error::{ConstraintError, ParseFlagError, Result};
pub use event::{ControlEvent, ControlEventKind};
pub use validity::{ValidityFlag, ValidityState};
