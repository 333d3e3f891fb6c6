#![forbid(unsafe_code)]

//! Host document model: elements, form controls, listeners, and a document
//! that connects and disconnects components.
//!
//! The model is single-threaded (`Rc`/`RefCell`) like a UI event loop. All
//! dispatch is synchronous: a signal's listeners run to completion before
//! the call that raised it returns.

pub mod control;
pub mod document;
pub mod element;
pub mod listener;

pub use control::{Control, ValidityReport, WeakControl};
pub use document::{Component, ComponentRef, Document, MountId};
pub use element::{Element, Node};
pub use listener::{Listener, ListenerId, ListenerRegistry, Subscription};
