//! Form Helpers
//!
//! Shared behaviour of every form component: snapshot the submitted form,
//! serialize its controls, and keep the API's validation errors so they
//! render next to the offending inputs.

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen::JsCast;

use crate::api::{ApiError, FieldErrors, Placement};
use crate::commands::Attributes;

/// One form control as seen at submit time
#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub name: String,
    pub value: String,
    /// Input type (`text`, `checkbox`, `submit`, ...) or tag name
    pub kind: String,
    pub checked: bool,
    pub disabled: bool,
}

impl FormControl {
    fn successful(&self) -> bool {
        if self.name.is_empty() || self.disabled {
            return false;
        }
        match self.kind.as_str() {
            "submit" | "button" | "reset" | "image" | "file" => false,
            "checkbox" | "radio" => self.checked,
            _ => true,
        }
    }
}

/// Name/value pairs of the controls a browser would submit, in order
pub fn serialize_controls(controls: &[FormControl]) -> Vec<(String, String)> {
    controls
        .iter()
        .filter(|control| control.successful())
        .map(|control| (control.name.clone(), control.value.clone()))
        .collect()
}

/// Flatten pairs into an attribute map; later duplicates win
pub fn to_attributes(pairs: &[(String, String)]) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in pairs {
        attributes.insert(name.clone(), Value::String(value.clone()));
    }
    attributes
}

/// Read every control of a live form element
pub fn form_controls(form: &web_sys::HtmlFormElement) -> Vec<FormControl> {
    let elements = form.elements();
    (0..elements.length())
        .filter_map(|index| elements.item(index))
        .filter_map(|element| {
            if let Some(input) = element.dyn_ref::<web_sys::HtmlInputElement>() {
                Some(FormControl {
                    name: input.name(),
                    value: input.value(),
                    kind: input.type_(),
                    checked: input.checked(),
                    disabled: input.disabled(),
                })
            } else if let Some(area) = element.dyn_ref::<web_sys::HtmlTextAreaElement>() {
                Some(FormControl {
                    name: area.name(),
                    value: area.value(),
                    kind: "textarea".to_string(),
                    checked: false,
                    disabled: area.disabled(),
                })
            } else if let Some(select) = element.dyn_ref::<web_sys::HtmlSelectElement>() {
                Some(FormControl {
                    name: select.name(),
                    value: select.value(),
                    kind: "select".to_string(),
                    checked: false,
                    disabled: select.disabled(),
                })
            } else {
                // Buttons and fieldsets never submit a value here
                None
            }
        })
        .collect()
}

/// Per-form state: the field names it renders and the current errors
#[derive(Clone, Copy)]
pub struct FormState {
    fields: &'static [&'static str],
    errors: RwSignal<FieldErrors>,
    pub submitting: RwSignal<bool>,
}

impl FormState {
    pub fn new(fields: &'static [&'static str]) -> Self {
        Self {
            fields,
            errors: RwSignal::new(FieldErrors::new()),
            submitting: RwSignal::new(false),
        }
    }

    /// Start a submission: stop the browser's own submit, clear old
    /// errors and return the serialized controls of the submitted form.
    pub fn begin_submit(&self, ev: &web_sys::SubmitEvent) -> Option<Vec<(String, String)>> {
        ev.prevent_default();
        self.errors.set(FieldErrors::new());
        // submit is dispatched on the form itself
        let form = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlFormElement>().ok())?;
        self.submitting.set(true);
        Some(serialize_controls(&form_controls(&form)))
    }

    pub fn succeed(&self) {
        self.submitting.set(false);
    }

    pub fn fail(&self, error: &ApiError) {
        log::warn!("[FORM] Submission failed: {}", error);
        self.submitting.set(false);
        self.errors.set(error.field_errors());
    }

    fn placement(&self) -> Placement {
        self.errors.with(|errors| errors.place(self.fields))
    }

    /// Errors for the input named `field` (tracked)
    pub fn errors_for(&self, field: &'static str) -> Signal<Vec<String>> {
        let state = *self;
        Signal::derive(move || state.placement().by_field.remove(field).unwrap_or_default())
    }

    /// Errors matching no input, shown before the first label (tracked)
    pub fn unmatched_errors(&self) -> Signal<Vec<String>> {
        let state = *self;
        Signal::derive(move || state.placement().unmatched)
    }
}

/// Inline validation messages
#[component]
pub fn ErrorList(#[prop(into)] messages: Signal<Vec<String>>) -> impl IntoView {
    view! {
        <For
            each=move || messages.get().into_iter().enumerate()
            key=|(index, message)| (*index, message.clone())
            children=move |(_, message)| view! { <span class="error">{message}</span> }
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(name: &str, value: &str, kind: &str) -> FormControl {
        FormControl {
            name: name.to_string(),
            value: value.to_string(),
            kind: kind.to_string(),
            checked: false,
            disabled: false,
        }
    }

    #[test]
    fn only_successful_controls_are_serialized() {
        let mut checked = control("remember", "on", "checkbox");
        checked.checked = true;
        let mut disabled = control("locked", "x", "text");
        disabled.disabled = true;

        let controls = vec![
            control("name", "Sprint 1", "text"),
            control("", "no name", "text"),
            control("save", "Save", "submit"),
            control("notify", "on", "checkbox"),
            checked,
            disabled,
            control("description", "Line", "textarea"),
        ];
        let pairs = serialize_controls(&controls);
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "Sprint 1".to_string()),
                ("remember".to_string(), "on".to_string()),
                ("description".to_string(), "Line".to_string()),
            ]
        );
    }

    #[test]
    fn attributes_keep_last_duplicate() {
        let pairs = vec![
            ("name".to_string(), "first".to_string()),
            ("end".to_string(), "2024-01-01".to_string()),
            ("name".to_string(), "second".to_string()),
        ];
        let attributes = to_attributes(&pairs);
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["name"], Value::String("second".to_string()));
    }
}
