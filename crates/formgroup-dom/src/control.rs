#![forbid(unsafe_code)]

//! Form controls (`input`, `textarea`).
//!
//! A [`Control`] is a cheap, cloneable handle to shared control state: its
//! attributes, derived constraints, current value, and listeners. Clones
//! refer to the same control. [`WeakControl`] is the non-owning form held by
//! anything that must not keep a control alive.
//!
//! # Dispatch
//!
//! Listeners are snapshotted before they run, so a listener may add or
//! remove listeners (including itself) or read the control without a
//! borrow conflict. Changes to the registry made during a dispatch take
//! effect from the next dispatch.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use formgroup_core::{Constraints, ControlEvent, ControlEventKind, Result, ValidityState};

use crate::listener::{Listener, ListenerId, ListenerRegistry, Subscription};

/// Tags that name a form control.
pub const CONTROL_TAGS: [&str; 2] = ["input", "textarea"];

struct ControlInner {
    tag: String,
    attributes: BTreeMap<String, String>,
    constraints: Constraints,
    value: String,
    custom_validity: String,
    listeners: ListenerRegistry,
}

/// Shared handle to one form control.
#[derive(Clone)]
pub struct Control {
    inner: Rc<RefCell<ControlInner>>,
}

/// Non-owning handle to a [`Control`].
#[derive(Clone, Default)]
pub struct WeakControl {
    inner: Weak<RefCell<ControlInner>>,
}

/// Outcome of [`Control::report_validity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityReport {
    /// The snapshot at the time of the report.
    pub validity: ValidityState,
    /// Whether the platform's own validation popup would be shown. False when
    /// the control is valid or a listener cancelled the invalid signal.
    pub native_popup: bool,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Control")
            .field("tag", &inner.tag)
            .field("attributes", &inner.attributes)
            .field("value", &inner.value)
            .field("listeners", &inner.listeners)
            .finish()
    }
}

impl fmt::Debug for WeakControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakControl")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Control {
    /// Create a control from its tag and attributes. Constraints are derived
    /// from the attributes; an invalid constraint attribute is an error.
    pub fn new<K, V>(tag: &str, attributes: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let tag = tag.to_ascii_lowercase();
        let attributes: BTreeMap<String, String> = attributes
            .into_iter()
            .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into()))
            .collect();
        let constraints = derive_constraints(&tag, &attributes)?;
        let value = attributes.get("value").cloned().unwrap_or_default();
        Ok(Self {
            inner: Rc::new(RefCell::new(ControlInner {
                tag,
                attributes,
                constraints,
                value,
                custom_validity: String::new(),
                listeners: ListenerRegistry::new(),
            })),
        })
    }

    /// A text `input` with no attributes.
    #[must_use]
    pub fn text_input() -> Self {
        Self::from_constraints("input", Constraints::default())
    }

    /// A control with explicit constraints and no attributes.
    #[must_use]
    pub fn from_constraints(tag: &str, constraints: Constraints) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ControlInner {
                tag: tag.to_ascii_lowercase(),
                attributes: BTreeMap::new(),
                constraints,
                value: String::new(),
                custom_validity: String::new(),
                listeners: ListenerRegistry::new(),
            })),
        }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakControl {
        WeakControl {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same control.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    /// Set an attribute and re-derive constraints. On error the control is
    /// left unchanged.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let mut attributes = inner.attributes.clone();
        attributes.insert(name.to_ascii_lowercase(), value.into());
        inner.constraints = derive_constraints(&inner.tag, &attributes)?;
        inner.attributes = attributes;
        Ok(())
    }

    /// Remove an attribute and re-derive constraints.
    pub fn remove_attribute(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let mut attributes = inner.attributes.clone();
        attributes.remove(&name.to_ascii_lowercase());
        inner.constraints = derive_constraints(&inner.tag, &attributes)?;
        inner.attributes = attributes;
        Ok(())
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    /// Set the value programmatically. Fires nothing.
    pub fn set_value(&self, value: impl Into<String>) {
        self.inner.borrow_mut().value = value.into();
    }

    /// Replace the value as a user edit would, then fire `input`.
    pub fn input_text(&self, value: impl Into<String>) {
        self.set_value(value);
        self.dispatch(ControlEventKind::Input);
    }

    /// Append one typed character, then fire `input`.
    pub fn type_char(&self, ch: char) {
        self.inner.borrow_mut().value.push(ch);
        self.dispatch(ControlEventKind::Input);
    }

    /// The control loses focus: fire `blur`.
    pub fn blur(&self) {
        self.dispatch(ControlEventKind::Blur);
    }

    /// Set (or clear, with an empty string) the custom validity message.
    pub fn set_custom_validity(&self, message: impl Into<String>) {
        self.inner.borrow_mut().custom_validity = message.into();
    }

    /// Fresh validity snapshot derived from the current value.
    #[must_use]
    pub fn validity(&self) -> ValidityState {
        let inner = self.inner.borrow();
        inner.constraints.evaluate(&inner.value, &inner.custom_validity)
    }

    /// Returns whether the control is valid, firing `invalid` when it is not.
    pub fn check_validity(&self) -> bool {
        self.report_validity().validity.is_valid()
    }

    /// Like [`check_validity`](Self::check_validity), also reporting whether
    /// the platform popup would be shown.
    pub fn report_validity(&self) -> ValidityReport {
        let validity = self.validity();
        if validity.is_valid() {
            return ValidityReport {
                validity,
                native_popup: false,
            };
        }
        let event = self.dispatch(ControlEventKind::Invalid);
        ValidityReport {
            validity,
            native_popup: !event.default_prevented(),
        }
    }

    /// Register a listener.
    pub fn add_listener(
        &self,
        kind: ControlEventKind,
        listener: impl Fn(&mut ControlEvent) + 'static,
    ) -> ListenerId {
        self.add_shared_listener(kind, Rc::new(listener))
    }

    pub fn add_shared_listener(&self, kind: ControlEventKind, listener: Listener) -> ListenerId {
        self.inner.borrow_mut().listeners.add(kind, listener)
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_listener(&self, kind: ControlEventKind, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(kind, id)
    }

    /// Install a set of listeners as one unit. The returned [`Subscription`]
    /// removes exactly this set.
    pub fn subscribe(
        &self,
        listeners: impl IntoIterator<Item = (ControlEventKind, Listener)>,
    ) -> Subscription {
        let entries = listeners
            .into_iter()
            .map(|(kind, listener)| (kind, self.add_shared_listener(kind, listener)))
            .collect();
        Subscription::new(self.downgrade(), entries)
    }

    #[must_use]
    pub fn listener_count(&self, kind: ControlEventKind) -> usize {
        self.inner.borrow().listeners.count(kind)
    }

    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.inner.borrow().listeners.total()
    }

    /// Fire `kind` synchronously and return the finished event.
    pub fn dispatch(&self, kind: ControlEventKind) -> ControlEvent {
        let listeners = self.inner.borrow().listeners.snapshot(kind);
        tracing::trace!(
            message = "control.dispatch",
            kind = kind.as_str(),
            listeners = listeners.len()
        );
        let mut event = ControlEvent::new(kind);
        for listener in listeners {
            listener(&mut event);
        }
        event
    }
}

impl WeakControl {
    /// A handle that never upgrades.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn upgrade(&self) -> Option<Control> {
        self.inner.upgrade().map(|inner| Control { inner })
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

fn derive_constraints(tag: &str, attributes: &BTreeMap<String, String>) -> Result<Constraints> {
    Constraints::from_attributes(tag, |name| attributes.get(name).map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgroup_core::ValidityFlag;
    use std::cell::Cell;

    #[test]
    fn attributes_drive_validity() {
        let control = Control::new("input", [("required", ""), ("minlength", "3")]).unwrap();
        assert_eq!(
            control.validity().first_failure(),
            Some(ValidityFlag::ValueMissing)
        );
        control.set_value("ab");
        assert_eq!(
            control.validity().first_failure(),
            Some(ValidityFlag::TooShort)
        );
        control.set_value("abc");
        assert!(control.validity().is_valid());
    }

    #[test]
    fn value_attribute_seeds_value() {
        let control = Control::new("input", [("value", "seed")]).unwrap();
        assert_eq!(control.value(), "seed");
    }

    #[test]
    fn rejected_attribute_leaves_control_unchanged() {
        let control = Control::new("input", [("pattern", "[a-z]+")]).unwrap();
        control.set_value("1");
        assert!(control.set_attribute("pattern", "(").is_err());
        assert_eq!(control.attribute("pattern").as_deref(), Some("[a-z]+"));
        assert!(control.validity().has(ValidityFlag::PatternMismatch));

        control.remove_attribute("pattern").unwrap();
        assert!(control.validity().is_valid());
    }

    #[test]
    fn input_and_blur_fire_listeners() {
        let control = Control::text_input();
        let inputs = Rc::new(Cell::new(0));
        let blurs = Rc::new(Cell::new(0));
        {
            let inputs = Rc::clone(&inputs);
            control.add_listener(ControlEventKind::Input, move |_| {
                inputs.set(inputs.get() + 1);
            });
        }
        {
            let blurs = Rc::clone(&blurs);
            control.add_listener(ControlEventKind::Blur, move |_| blurs.set(blurs.get() + 1));
        }
        control.type_char('a');
        control.input_text("abc");
        control.blur();
        assert_eq!(inputs.get(), 2);
        assert_eq!(blurs.get(), 1);
        assert_eq!(control.value(), "abc");
    }

    #[test]
    fn set_value_is_silent() {
        let control = Control::text_input();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        control.add_listener(ControlEventKind::Input, move |_| flag.set(true));
        control.set_value("x");
        assert!(!fired.get());
    }

    #[test]
    fn report_validity_respects_prevent_default() {
        let control = Control::new("input", [("required", "")]).unwrap();
        let report = control.report_validity();
        assert!(report.native_popup);

        control.add_listener(ControlEventKind::Invalid, ControlEvent::prevent_default);
        let report = control.report_validity();
        assert!(!report.native_popup);
        assert!(report.validity.has(ValidityFlag::ValueMissing));

        control.set_value("ok");
        assert!(control.check_validity());
    }

    #[test]
    fn valid_control_does_not_fire_invalid() {
        let control = Control::text_input();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        control.add_listener(ControlEventKind::Invalid, move |_| flag.set(true));
        assert!(control.check_validity());
        assert!(!fired.get());
    }

    #[test]
    fn listener_may_remove_itself_during_dispatch() {
        let control = Control::text_input();
        let hits = Rc::new(Cell::new(0));
        let id_slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let weak = control.downgrade();
        let id = {
            let hits = Rc::clone(&hits);
            let id_slot = Rc::clone(&id_slot);
            control.add_listener(ControlEventKind::Blur, move |_| {
                hits.set(hits.get() + 1);
                if let (Some(control), Some(id)) = (weak.upgrade(), id_slot.get()) {
                    control.remove_listener(ControlEventKind::Blur, id);
                }
            })
        };
        id_slot.set(Some(id));
        control.blur();
        control.blur();
        assert_eq!(hits.get(), 1);
        assert_eq!(control.listener_count(ControlEventKind::Blur), 0);
    }

    #[test]
    fn subscription_removes_exactly_its_set() {
        let control = Control::text_input();
        let other = control.add_listener(ControlEventKind::Input, |_| {});
        let noop: Listener = Rc::new(|_: &mut ControlEvent| {});
        let sub = control.subscribe(
            ControlEventKind::ALL
                .into_iter()
                .map(|kind| (kind, Rc::clone(&noop))),
        );
        assert_eq!(sub.len(), 3);
        assert_eq!(control.total_listeners(), 4);

        assert_eq!(sub.cancel(), 3);
        assert_eq!(control.total_listeners(), 1);
        assert!(control.remove_listener(ControlEventKind::Input, other));
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let control = Control::text_input();
        {
            let _sub = control.subscribe([(
                ControlEventKind::Blur,
                Rc::new(|_: &mut ControlEvent| {}) as Listener,
            )]);
            assert_eq!(control.listener_count(ControlEventKind::Blur), 1);
        }
        assert_eq!(control.listener_count(ControlEventKind::Blur), 0);
    }

    #[test]
    fn weak_handle_does_not_keep_control_alive() {
        let control = Control::text_input();
        let weak = control.downgrade();
        let sub = control.subscribe([(
            ControlEventKind::Input,
            Rc::new(|_: &mut ControlEvent| {}) as Listener,
        )]);
        assert!(weak.is_alive());
        drop(control);
        assert!(!weak.is_alive());
        assert_eq!(sub.cancel(), 0);
        assert!(WeakControl::new().upgrade().is_none());
    }
}
