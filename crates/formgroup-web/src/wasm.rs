//! `wasm-bindgen` glue for a live `<form-group>` element.

use std::cell::RefCell;
use std::rc::Rc;

use formgroup_core::ValidityState;
use formgroup_widgets::ErrorMessage;
use formgroup_widgets::error_message::{CLASS, STYLESHEET};
use formgroup_widgets::form_group::TAG;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, HtmlElement, HtmlInputElement, HtmlTextAreaElement, ShadowRootInit,
    ShadowRootMode,
};

use crate::native::{NativeValidity, select_message};

const CONTROL_SELECTOR: &str = "input, textarea";

type EventClosure = Closure<dyn FnMut(Event)>;

#[wasm_bindgen(module = "/js/form-group.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = defineElement)]
    fn define_element(
        tag: &str,
        create: &Closure<dyn FnMut(HtmlElement) -> Result<JsValue, JsValue>>,
    ) -> Result<bool, JsValue>;
}

/// Register `<form-group>` with `customElements`.
///
/// Returns `false` when the tag is already defined. Each element created by
/// the browser owns one [`FormGroupElement`] and forwards its
/// `connectedCallback` and `disconnectedCallback` to it.
#[wasm_bindgen(js_name = defineFormGroup)]
pub fn define_form_group() -> Result<bool, JsValue> {
    let create: Closure<dyn FnMut(HtmlElement) -> Result<JsValue, JsValue>> =
        Closure::new(|host: HtmlElement| FormGroupElement::new(host).map(JsValue::from));
    let defined = define_element(TAG, &create)?;
    // Elements may be created for the rest of the page's life.
    create.forget();
    tracing::debug!(message = "formgroup.define", tag = TAG, defined);
    Ok(defined)
}

/// The shadow-root region plus its text model.
struct Region {
    span: Element,
    model: ErrorMessage,
}

impl Region {
    fn show(&mut self, text: &str) {
        if self.model.show(text) {
            self.span.set_text_content(Some(self.model.text()));
        }
    }

    fn clear(&mut self) {
        if self.model.clear() {
            self.span.set_text_content(None);
            tracing::debug!(message = "formgroup.clear");
        }
    }
}

/// Listeners added to one control. Dropping removes exactly these.
struct DomSubscription {
    target: Element,
    entries: Vec<(&'static str, EventClosure)>,
}

impl DomSubscription {
    fn new(target: Element) -> Self {
        Self {
            target,
            entries: Vec::with_capacity(3),
        }
    }

    fn listen(&mut self, kind: &'static str, closure: EventClosure) -> Result<(), JsValue> {
        self.target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.entries.push((kind, closure));
        Ok(())
    }
}

impl Drop for DomSubscription {
    fn drop(&mut self) {
        for (kind, closure) in self.entries.drain(..) {
            // The target may already be gone from the document.
            let _ = self
                .target
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

fn read_validity(control: &Element) -> Option<ValidityState> {
    let platform = if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
        input.validity()
    } else if let Some(area) = control.dyn_ref::<HtmlTextAreaElement>() {
        area.validity()
    } else {
        return None;
    };
    Some(
        NativeValidity {
            value_missing: platform.value_missing(),
            too_long: platform.too_long(),
            too_short: platform.too_short(),
            range_overflow: platform.range_overflow(),
            range_underflow: platform.range_underflow(),
            type_mismatch: platform.type_mismatch(),
            pattern_mismatch: platform.pattern_mismatch(),
            step_mismatch: platform.step_mismatch(),
            bad_input: platform.bad_input(),
            custom_error: platform.custom_error(),
        }
        .into(),
    )
}

/// Rust side of the `<form-group>` custom element.
///
/// A JS class extending `HTMLElement` constructs this with itself as host
/// and forwards `connectedCallback`/`disconnectedCallback`.
#[wasm_bindgen]
pub struct FormGroupElement {
    host: HtmlElement,
    region: Rc<RefCell<Region>>,
    subscription: Option<DomSubscription>,
}

#[wasm_bindgen]
impl FormGroupElement {
    /// Attach an open shadow root holding the slot and the error region.
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement) -> Result<FormGroupElement, JsValue> {
        let model = ErrorMessage::new();
        let shadow = host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?;
        shadow.set_inner_html(&format!(
            "<style>{STYLESHEET}</style><slot></slot>{}",
            model.render_html()
        ));
        let span = shadow
            .query_selector(&format!(".{CLASS}"))?
            .ok_or_else(|| JsValue::from_str("form-group: error region missing"))?;
        Ok(Self {
            host,
            region: Rc::new(RefCell::new(Region { span, model })),
            subscription: None,
        })
    }

    #[wasm_bindgen(js_name = connectedCallback)]
    pub fn connected(&mut self) -> Result<(), JsValue> {
        self.subscription = None;
        let Some(control) = self.host.query_selector(CONTROL_SELECTOR)? else {
            tracing::debug!(message = "formgroup.attach", has_control = false);
            return Ok(());
        };

        let on_invalid: EventClosure = Closure::new(|event: Event| {
            event.prevent_default();
            tracing::debug!(message = "formgroup.invalid");
        });
        let on_input: EventClosure = {
            let region = Rc::clone(&self.region);
            Closure::new(move |_: Event| region.borrow_mut().clear())
        };
        let on_blur: EventClosure = {
            let region = Rc::clone(&self.region);
            let host = self.host.clone();
            let target = control.clone();
            Closure::new(move |_: Event| {
                let Some(state) = read_validity(&target) else {
                    return;
                };
                if let Some(text) = select_message(state, |name| host.get_attribute(name)) {
                    region.borrow_mut().show(&text);
                    tracing::debug!(message = "formgroup.show");
                }
            })
        };

        let mut subscription = DomSubscription::new(control);
        subscription.listen("invalid", on_invalid)?;
        subscription.listen("input", on_input)?;
        subscription.listen("blur", on_blur)?;
        self.subscription = Some(subscription);
        tracing::debug!(message = "formgroup.attach", has_control = true);
        Ok(())
    }

    #[wasm_bindgen(js_name = disconnectedCallback)]
    pub fn disconnected(&mut self) {
        let removed = self.subscription.take().map_or(0, |s| s.entries.len());
        tracing::debug!(message = "formgroup.detach", removed);
    }

    /// Current region text; empty when no error is shown.
    #[wasm_bindgen(getter, js_name = messageText)]
    pub fn message_text(&self) -> String {
        self.region.borrow().model.text().to_string()
    }
}
