#![forbid(unsafe_code)]

//! Browser binding of the `<form-group>` field validator.
//!
//! On `wasm32` this crate exports [`FormGroupElement`], a `wasm-bindgen`
//! struct, and `defineFormGroup()`, which registers `<form-group>` through
//! the custom-element class in `js/form-group.js`. That class forwards its
//! lifecycle callbacks to the struct. The element reads validity from the platform's own constraint
//! validation instead of re-evaluating constraints.
//!
//! The platform-independent part lives in [`native`] and is tested natively.

pub mod native;

pub use native::{NativeValidity, select_message};

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FormGroupElement, define_form_group};

#[cfg(test)]
mod tests {
    use formgroup_widgets::form_group::TAG;

    const ELEMENT_SHIM: &str = include_str!("../js/form-group.js");

    #[test]
    fn shim_registers_a_custom_element() {
        assert_eq!(TAG, "form-group");
        assert!(ELEMENT_SHIM.contains("export function defineElement(tag, create)"));
        assert!(ELEMENT_SHIM.contains("customElements.define("));
        assert!(ELEMENT_SHIM.contains("extends HTMLElement"));
    }

    #[test]
    fn shim_forwards_both_lifecycle_callbacks() {
        for callback in ["connectedCallback", "disconnectedCallback"] {
            let forward = format!("this.formGroup.{callback}()");
            assert!(ELEMENT_SHIM.contains(&forward), "{callback} is not forwarded");
        }
    }
}
