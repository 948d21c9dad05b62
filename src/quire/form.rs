//! Forms and their validation state machine.
//!
//! Validation runs at most once per form instance: the first call to
//! `is_valid` moves the form from [`ValidationState::Unvalidated`] to `Valid` or
//! `Invalid`, and later calls read the stored state. Field values come from
//! the submitted data in the [`RequestContext`], matched by field slug.

use crate::config::QuireConfig;
use crate::field::{Field, FieldBearer};
use crate::request::RequestContext;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationState {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

/// Called with the form after validation settles.
pub type FormCallback<F> = Rc<dyn Fn(&mut F)>;

/// Extra per-field check. Runs after the field validated itself; an `Err`
/// becomes one more error on the field.
pub type FieldValidator<F> = Rc<dyn Fn(&Field, &F) -> std::result::Result<(), String>>;

/// A submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAction {
    label: String,
    method: String,
    target: String,
}

impl FormAction {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            method: "POST".to_string(),
            target: target.into(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Validators, errors, state and callbacks shared by [`Form`] and
/// [`TableForm`](crate::table::TableForm).
pub(crate) struct Validation<F> {
    pub(crate) validators: HashMap<String, Vec<FieldValidator<F>>>,
    pub(crate) errors: Vec<String>,
    pub(crate) state: ValidationState,
    pub(crate) on_valid: Option<FormCallback<F>>,
    pub(crate) on_invalid: Option<FormCallback<F>>,
}

impl<F> Default for Validation<F> {
    fn default() -> Self {
        Self {
            validators: HashMap::new(),
            errors: Vec::new(),
            state: ValidationState::Unvalidated,
            on_valid: None,
            on_invalid: None,
        }
    }
}

impl<F> Clone for Validation<F> {
    fn clone(&self) -> Self {
        Self {
            validators: self.validators.clone(),
            errors: self.errors.clone(),
            state: self.state,
            on_valid: self.on_valid.clone(),
            on_invalid: self.on_invalid.clone(),
        }
    }
}

impl<F> Validation<F> {
    pub(crate) fn add_validator(&mut self, field: &str, validator: FieldValidator<F>) {
        self.validators
            .entry(field.to_string())
            .or_default()
            .push(validator);
    }

    /// Failures of every registered validator for `field`.
    pub(crate) fn check(&self, field: &Field, form: &F) -> Vec<String> {
        self.validators
            .get(field.name())
            .into_iter()
            .flatten()
            .filter_map(|validator| validator(field, form).err())
            .collect()
    }
}

/// A form over a single set of fields.
#[derive(Clone)]
pub struct Form {
    id: String,
    field_bearer: FieldBearer,
    actions: Vec<FormAction>,
    validation: Validation<Form>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.id)
            .field("field_bearer", &self.field_bearer)
            .field("actions", &self.actions)
            .field("errors", &self.validation.errors)
            .field("state", &self.validation.state)
            .finish_non_exhaustive()
    }
}

impl Form {
    pub fn new(id: impl Into<String>, field_bearer: FieldBearer) -> Self {
        Self {
            id: id.into(),
            field_bearer,
            actions: Vec::new(),
            validation: Validation::default(),
        }
    }

    pub fn with_action(mut self, action: FormAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_validator<V>(mut self, field: &str, validator: V) -> Self
    where
        V: Fn(&Field, &Form) -> std::result::Result<(), String> + 'static,
    {
        self.validation.add_validator(field, Rc::new(validator));
        self
    }

    pub fn on_valid<C: Fn(&mut Form) + 'static>(mut self, callback: C) -> Self {
        self.validation.on_valid = Some(Rc::new(callback));
        self
    }

    pub fn on_invalid<C: Fn(&mut Form) + 'static>(mut self, callback: C) -> Self {
        self.validation.on_invalid = Some(Rc::new(callback));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field_bearer(&self) -> &FieldBearer {
        &self.field_bearer
    }

    pub fn field_bearer_mut(&mut self) -> &mut FieldBearer {
        &mut self.field_bearer
    }

    pub fn actions(&self) -> &[FormAction] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut [FormAction] {
        &mut self.actions
    }

    pub fn errors(&self) -> &[String] {
        &self.validation.errors
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.validation.errors.push(error.into());
    }

    pub fn validation_state(&self) -> ValidationState {
        self.validation.state
    }

    /// Validates on first call, then answers from the stored state.
    pub fn is_valid(&mut self, request: &RequestContext, config: &QuireConfig) -> bool {
        if self.validation.state == ValidationState::Unvalidated {
            self.validate(request, config);
        }
        self.validation.state == ValidationState::Valid
    }

    fn validate(&mut self, request: &RequestContext, config: &QuireConfig) {
        for field in self.field_bearer.all_fields_mut() {
            if !field.field_type().is_input() {
                continue;
            }
            if let Some(submitted) = request.submitted(&field.slug()) {
                field.set_initial(Value::from(submitted));
            }
            field.validate(config);
        }

        let failures: Vec<(String, Vec<String>)> = self
            .field_bearer
            .all_fields()
            .into_iter()
            .map(|field| (field.slug(), self.validation.check(field, self)))
            .filter(|(_, errors)| !errors.is_empty())
            .collect();
        for (slug, errors) in failures {
            if let Some(field) = self
                .field_bearer
                .all_fields_mut()
                .into_iter()
                .find(|f| f.slug() == slug)
            {
                errors.into_iter().for_each(|e| field.add_error(e));
            }
        }

        let valid = self.field_bearer.all_fields().iter().all(|f| f.is_valid());
        if valid {
            self.validation.state = ValidationState::Valid;
        } else {
            self.validation.state = ValidationState::Invalid;
            self.add_error(config.form_error_message.clone());
        }
        debug!(form = self.id.as_str(), valid, "form validated");
    }

    pub fn run_on_valid(&mut self) {
        if let Some(callback) = self.validation.on_valid.clone() {
            callback(self);
        }
    }

    pub fn run_on_invalid(&mut self) {
        if let Some(callback) = self.validation.on_invalid.clone() {
            callback(self);
        }
    }
}
