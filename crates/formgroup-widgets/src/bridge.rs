#![forbid(unsafe_code)]

//! Event bridge between a wrapped control and its [`FormGroup`](crate::FormGroup).
//!
//! Three reactions, all synchronous:
//!
//! - `invalid`: cancel the platform popup; the group's region is the only
//!   error surface.
//! - `input`: clear the region so no stale error shows while the user edits.
//! - `blur`: re-derive validity and, if invalid, show the message for the
//!   highest-priority failure. A valid control leaves the region untouched.
//!
//! A reaction that finds the host or the region already borrowed (a caller
//! holding [`FormGroup::error_message`](crate::FormGroup::error_message) or
//! [`FormGroup::host_mut`](crate::FormGroup::host_mut)) is skipped.
//!
//! Handlers hold the group and the control weakly. The control owns its
//! listeners and the group's host owns the control, so a strong reference
//! here would form a cycle.

use std::rc::{Rc, Weak};

use formgroup_core::{ControlEvent, ControlEventKind};
use formgroup_dom::{Control, Listener, Subscription, WeakControl};

use crate::form_group::FormGroupInner;

/// Install the three reactions on `control` as one subscription.
pub(crate) fn install(control: &Control, group: &Rc<FormGroupInner>) -> Subscription {
    let on_input: Listener = {
        let group = Rc::downgrade(group);
        Rc::new(move |_: &mut ControlEvent| {
            if let Some(group) = group.upgrade() {
                handle_input(&group);
            }
        })
    };
    let on_blur: Listener = {
        let group = Rc::downgrade(group);
        let control = control.downgrade();
        Rc::new(move |_: &mut ControlEvent| handle_blur(&group, &control))
    };

    control.subscribe([
        (ControlEventKind::Invalid, Rc::new(handle_invalid) as Listener),
        (ControlEventKind::Input, on_input),
        (ControlEventKind::Blur, on_blur),
    ])
}

fn handle_invalid(event: &mut ControlEvent) {
    event.prevent_default();
    tracing::debug!(message = "formgroup.invalid");
}

fn handle_input(group: &FormGroupInner) {
    let Ok(mut region) = group.message.try_borrow_mut() else {
        tracing::debug!(message = "formgroup.busy", signal = "input");
        return;
    };
    if region.clear() {
        tracing::debug!(message = "formgroup.clear");
    }
}

fn handle_blur(group: &Weak<FormGroupInner>, control: &WeakControl) {
    let (Some(group), Some(control)) = (group.upgrade(), control.upgrade()) else {
        return;
    };
    let Some(flag) = control.validity().first_failure() else {
        return;
    };
    let config = group.try_message_config();
    let region = group.message.try_borrow_mut();
    let (Some(config), Ok(mut region)) = (config, region) else {
        tracing::debug!(message = "formgroup.busy", signal = "blur");
        return;
    };
    match config.resolve(flag) {
        Some(text) => {
            region.show(text);
            tracing::debug!(message = "formgroup.show", flag = flag.failure_name());
        }
        None => {
            tracing::debug!(message = "formgroup.unmessaged", flag = flag.failure_name());
        }
    }
}
