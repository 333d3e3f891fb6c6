#![forbid(unsafe_code)]

//! `<form-group>`: progressive-enhancement validation for one wrapped field.
//!
//! The group wraps existing markup containing a single control (`input` or
//! `textarea`). While connected it listens to that control and shows at most
//! one error message in its own region, chosen by validity priority and
//! resolved against the host's `<stem>-message` attributes.
//!
//! # Lifecycle
//!
//! - `connected`: find the first descendant control. None found means the
//!   group stays inert. Otherwise install the event bridge and keep the
//!   returned [`Subscription`].
//! - `disconnected`: cancel that subscription, removing exactly the
//!   listeners it installed, and forget the control.
//!
//! # Invariants
//!
//! 1. At most one subscription exists per group. Connecting while already
//!    connected first releases the previous one.
//! 2. The group holds its control weakly.
//! 3. The region never holds more than one message.
//! 4. Signals never panic on a held guard. A reaction that finds the host
//!    or region borrowed by a caller is skipped.
//!
//! Only the first control is wrapped. Radio groups and other multi-control
//! fields are not handled.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use formgroup_dom::control::CONTROL_TAGS;
use formgroup_dom::{Component, Control, Element, Subscription, WeakControl};

use crate::bridge;
use crate::error_message::{Announcement, ErrorMessage, ErrorMessageStyle};
use crate::messages::MessageConfig;

/// Tag name of the host element.
pub const TAG: &str = "form-group";

/// State shared with the event bridge.
#[derive(Debug)]
pub(crate) struct FormGroupInner {
    pub(crate) host: RefCell<Element>,
    pub(crate) message: RefCell<ErrorMessage>,
}

impl FormGroupInner {
    /// Overrides as currently set on the host. Never cached.
    pub(crate) fn message_config(&self) -> MessageConfig {
        let host = self.host.borrow();
        MessageConfig::from_attributes(|name| host.attribute(name))
    }

    /// Like [`message_config`](Self::message_config), but `None` while a
    /// caller holds [`FormGroup::host_mut`].
    pub(crate) fn try_message_config(&self) -> Option<MessageConfig> {
        let host = self.host.try_borrow().ok()?;
        Some(MessageConfig::from_attributes(|name| host.attribute(name)))
    }
}

/// The field validator component.
#[derive(Debug)]
pub struct FormGroup {
    inner: Rc<FormGroupInner>,
    control: WeakControl,
    subscription: Option<Subscription>,
}

impl FormGroup {
    /// Wrap `host`, whose children are the light-DOM content and whose
    /// attributes carry message overrides.
    #[must_use]
    pub fn new(host: Element) -> Self {
        Self {
            inner: Rc::new(FormGroupInner {
                host: RefCell::new(host),
                message: RefCell::new(ErrorMessage::new()),
            }),
            control: WeakControl::new(),
            subscription: None,
        }
    }

    /// A `<form-group>` host wrapping `children`.
    #[must_use]
    pub fn wrapping(children: impl IntoIterator<Item = formgroup_dom::Node>) -> Self {
        let mut host = Element::new(TAG);
        for child in children {
            host.push_child(child);
        }
        Self::new(host)
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        self.inner.host.borrow_mut().set_attribute(name, value);
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.inner.host.borrow_mut().remove_attribute(name)
    }

    #[must_use]
    pub fn host(&self) -> Ref<'_, Element> {
        self.inner.host.borrow()
    }

    /// Mutable access to the host. Content changes take effect on the next
    /// `connected`.
    #[must_use]
    pub fn host_mut(&self) -> RefMut<'_, Element> {
        self.inner.host.borrow_mut()
    }

    /// Message overrides as currently set on the host.
    #[must_use]
    pub fn message_config(&self) -> MessageConfig {
        self.inner.message_config()
    }

    /// Region style from the host's inline `style` attribute.
    #[must_use]
    pub fn style(&self) -> ErrorMessageStyle {
        self.host()
            .attribute("style")
            .map(ErrorMessageStyle::from_inline)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn error_message(&self) -> Ref<'_, ErrorMessage> {
        self.inner.message.borrow()
    }

    /// Current region text; empty when no error is shown.
    #[must_use]
    pub fn message_text(&self) -> String {
        self.inner.message.borrow().text().to_string()
    }

    /// Drain the region's queued announcements.
    pub fn take_announcements(&self) -> Vec<Announcement> {
        self.inner.message.borrow_mut().take_announcements()
    }

    /// Whether the bridge is installed on a control.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// The wrapped control, while attached and alive.
    #[must_use]
    pub fn control(&self) -> Option<Control> {
        self.control.upgrade()
    }

    /// Shadow markup: the default slot followed by the region.
    #[must_use]
    pub fn render_shadow_html(&self) -> String {
        format!("<slot></slot>{}", self.error_message().render_html())
    }

    /// Find the control and install the bridge.
    pub fn attach(&mut self) {
        if self.subscription.is_some() {
            self.detach();
        }
        let control = self.inner.host.borrow().query_control(&CONTROL_TAGS);
        let Some(control) = control else {
            tracing::debug!(message = "formgroup.attach", has_control = false);
            return;
        };
        self.subscription = Some(bridge::install(&control, &self.inner));
        self.control = control.downgrade();
        tracing::debug!(
            message = "formgroup.attach",
            has_control = true,
            tag = control.tag().as_str()
        );
    }

    /// Remove the bridge and forget the control.
    pub fn detach(&mut self) {
        let removed = self.subscription.take().map_or(0, Subscription::cancel);
        self.control = WeakControl::new();
        tracing::debug!(message = "formgroup.detach", removed);
    }
}

impl Component for FormGroup {
    fn connected(&mut self) {
        self.attach();
    }

    fn disconnected(&mut self) {
        self.detach();
    }
}
