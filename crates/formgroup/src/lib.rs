#![forbid(unsafe_code)]

//! formgroup public facade crate.
//!
//! Re-exports the validity model, the host model and the `<form-group>`
//! widget under one name.

pub use formgroup_core::{
    Constraints, ConstraintError, ControlEvent, ControlEventKind, InputType, ValidityFlag,
    ValidityState,
};
pub use formgroup_dom::{Control, Document, Element, Node, Subscription};
pub use formgroup_widgets::{FormGroup, MessageConfig, default_message};

pub mod prelude {
    pub use formgroup_core as core;
    pub use formgroup_dom as dom;
    pub use formgroup_widgets as widgets;
}
