//! Form configuration: declared fields, validators, and visibility rules.
//!
//! A [`FormConfig`] is the static description a page supplies for one form:
//! which `state_key`s exist, which validators guard each of them, and which
//! fields are only rendered conditionally. Unknown keys are rejected here, at
//! construction time, so a misconfigured form fails before the first
//! interaction rather than at an arbitrary call site.

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::form::FormError;
use crate::types::{FieldValue, FormValues};

/// Predicate signature shared by all validators: `(value, whole_state) -> bool`.
///
/// Validators must be pure and synchronous; no I/O-bound field validation is
/// supported. A validator that panics is recovered fail-closed by the engine.
pub type ValidatorFn = dyn Fn(&FieldValue, &FormValues) -> bool + Send + Sync;

/// Predicate deciding whether a field is currently rendered.
///
/// When it returns false the field's validators are excluded from the
/// aggregate validity computation.
pub type VisibilityFn = dyn Fn(&FormValues) -> bool + Send + Sync;

/// Outcome of running a single validator against a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorOutcome {
    /// The constraint holds.
    Pass,
    /// The constraint is violated.
    Fail,
    /// The validator panicked; treated as a violation (fail-closed).
    Fault,
}

/// A named validation predicate.
///
/// The name identifies the violated constraint in
/// [`FormStatus::violations`](crate::form::FormStatus) so the UI can report
/// every failure, not just the first.
pub struct Validator {
    name: String,
    check: Box<ValidatorFn>,
}

impl Validator {
    /// Creates a validator from a name and a predicate.
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&FieldValue, &FormValues) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    /// Name of the constraint this validator enforces.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the predicate, isolating panics.
    ///
    /// A panic inside the predicate is the Rust analogue of an uncaught throw
    /// in the TypeScript validators; it must never crash the form, so it is
    /// caught here and reported as [`ValidatorOutcome::Fault`].
    #[must_use]
    pub fn run(&self, value: &FieldValue, values: &FormValues) -> ValidatorOutcome {
        match catch_unwind(AssertUnwindSafe(|| (self.check)(value, values))) {
            Ok(true) => ValidatorOutcome::Pass,
            Ok(false) => ValidatorOutcome::Fail,
            Err(_) => ValidatorOutcome::Fault,
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").field("name", &self.name).finish()
    }
}

/// The one validator the core ships: value is a non-empty string.
///
/// All domain-specific validators (email format, price range, ...) are
/// supplied by the pages that configure the form.
#[must_use]
pub fn non_empty_string() -> Validator {
    Validator::new("nonEmptyString", |value, _values| {
        value.as_text().is_some_and(|s| !s.trim().is_empty())
    })
}

/// Declaration of a single form field.
pub struct FieldConfig {
    /// The key in [`FormValues`] this field controls.
    pub state_key: String,
    /// Ordered constraints; empty means "always valid".
    pub validators: Vec<Validator>,
    /// Conditional rendering predicate; `None` means always visible.
    pub visible_when: Option<Box<VisibilityFn>>,
}

impl FieldConfig {
    /// Declares an always-visible field with the given validators.
    #[must_use]
    pub fn new(state_key: impl Into<String>, validators: Vec<Validator>) -> Self {
        Self {
            state_key: state_key.into(),
            validators,
            visible_when: None,
        }
    }

    /// Attaches a visibility predicate to this field.
    #[must_use]
    pub fn visible_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FormValues) -> bool + Send + Sync + 'static,
    {
        self.visible_when = Some(Box::new(predicate));
        self
    }

    /// Whether the field is rendered for the given values.
    #[must_use]
    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.visible_when.as_ref().is_none_or(|p| p(values))
    }
}

impl std::fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldConfig")
            .field("state_key", &self.state_key)
            .field("validators", &self.validators)
            .field("conditional", &self.visible_when.is_some())
            .finish()
    }
}

/// Static configuration of one form: its fields and initial values.
#[derive(Debug)]
pub struct FormConfig {
    fields: Vec<FieldConfig>,
    initial_state: FormValues,
}

impl FormConfig {
    /// Builds a form configuration, validating key declarations.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] when a `state_key` is declared
    /// twice or when `initial_state` carries a key no field declares. Both
    /// indicate a configuration bug and should abort form construction.
    pub fn new(fields: Vec<FieldConfig>, initial_state: FormValues) -> Result<Self, FormError> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.state_key.as_str()) {
                return Err(FormError::UnknownField {
                    key: field.state_key.clone(),
                });
            }
        }
        for key in initial_state.keys() {
            if !seen.contains(key.as_str()) {
                return Err(FormError::UnknownField { key: key.clone() });
            }
        }
        Ok(Self {
            fields,
            initial_state,
        })
    }

    /// Declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    /// The values a fresh form starts from.
    #[must_use]
    pub fn initial_state(&self) -> &FormValues {
        &self.initial_state
    }

    /// Whether the given key is declared by any field.
    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.state_key == key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
