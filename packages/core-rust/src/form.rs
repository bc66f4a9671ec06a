//! Form state engine: pure transitions over a single form's values.
//!
//! [`FormEngine`] owns one [`FormConfig`](crate::config::FormConfig) and
//! exposes pure transition functions over [`FormState`]: every mutation goes
//! through [`FormEngine::set_field`], which replaces the value and recomputes
//! the aggregate validity in one step, so no observer ever sees a partial
//! update. There is no ambient form context; callers thread the state value
//! explicitly, which keeps the engine testable without a UI tree.
//!
//! # Pristine semantics
//!
//! A freshly initialized form reports no invalid fields even when some are
//! technically invalid: fields are not pre-validated until the first
//! interaction. Per-field, [`FormEngine::field_phase`] reports `Pristine`
//! until that field's first `set_field`, so the UI can suppress error display
//! on untouched inputs.
//!
//! # Concurrency
//!
//! All transitions are synchronous and side-effect-free; the caller is
//! responsible for serializing them (a single-writer state container). The
//! only asynchronous boundary is the caller-owned submission action, which the
//! engine models as the `loading` flag gating re-entrant submits.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{FormConfig, ValidatorOutcome};
use crate::traits::SubmitOutcome;
use crate::types::{FieldValue, FormValues};

/// Errors raised by form configuration and transitions.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A key was written or declared that the form configuration does not
    /// know. Programmer error; indicates a configuration bug and should not
    /// be caught per-call.
    #[error("unknown form field: {key}")]
    UnknownField { key: String },
    /// A validator predicate panicked. Recovered locally: the field is
    /// treated as invalid and the fault is logged, never propagated as a
    /// crash.
    #[error("validator '{validator}' panicked while checking field '{key}'")]
    ValidatorFault { key: String, validator: String },
}

/// Aggregate status of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    /// A submission is in flight.
    pub loading: bool,
    /// The last submission was rejected.
    pub error: bool,
    /// Keys currently failing validation, in field-declaration order.
    /// A key appears here iff at least one of its validators fails against
    /// the current values and the field is visible.
    pub invalid_fields: Vec<String>,
    /// Every violated constraint per invalid field, in validator order.
    /// Validation is short-circuit-free: all validators run so the UI can
    /// report every violation, not just the first.
    pub violations: BTreeMap<String, Vec<String>>,
}

/// The complete state of one form instance.
///
/// Immutable-until-replaced: transitions return a new `FormState` rather than
/// mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current value per declared field key.
    pub values: FormValues,
    /// Derived validity and submission status.
    pub status: FormStatus,
    touched: BTreeSet<String>,
}

/// Interaction phase of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPhase {
    /// Never touched; error display is suppressed even if technically invalid.
    Pristine,
    /// Touched and passing all visible validators.
    Valid,
    /// Touched and failing at least one validator (or hidden-then-shown with
    /// a recorded failure).
    Invalid,
}

/// Pure form state engine for one configured form.
#[derive(Debug)]
pub struct FormEngine {
    config: FormConfig,
}

impl FormEngine {
    /// Wraps a validated configuration.
    #[must_use]
    pub fn new(config: FormConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine runs.
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Builds the initial state from the configuration.
    ///
    /// `invalid_fields` starts empty: fields are pristine and not
    /// pre-validated until the first interaction.
    #[must_use]
    pub fn initialize(&self) -> FormState {
        FormState {
            values: self.config.initial_state().clone(),
            status: FormStatus::default(),
            touched: BTreeSet::new(),
        }
    }

    /// Discards all interaction and returns to the initial state.
    #[must_use]
    pub fn reset(&self) -> FormState {
        self.initialize()
    }

    /// Writes one field and recomputes aggregate validity.
    ///
    /// Returns a new state where `values[key]` is replaced, the field is
    /// marked touched, and `invalid_fields`/`violations` are fully recomputed
    /// by re-running every visible field's validators against the new values.
    /// The input state is never modified.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownField`] when `key` is not declared by the form
    /// configuration.
    pub fn set_field(
        &self,
        state: &FormState,
        key: &str,
        value: FieldValue,
    ) -> Result<FormState, FormError> {
        if !self.config.declares(key) {
            return Err(FormError::UnknownField {
                key: key.to_string(),
            });
        }

        let mut values = state.values.clone();
        values.insert(key.to_string(), value);

        let mut touched = state.touched.clone();
        touched.insert(key.to_string());

        let (invalid_fields, violations) = self.validate(&values);
        Ok(FormState {
            values,
            status: FormStatus {
                loading: state.status.loading,
                error: state.status.error,
                invalid_fields,
                violations,
            },
            touched,
        })
    }

    /// True iff no visible field is currently failing validation.
    ///
    /// The single submit gate: a submit control is disabled exactly when this
    /// is false or a submission is already in flight.
    #[must_use]
    pub fn is_valid(&self, state: &FormState) -> bool {
        state.status.invalid_fields.is_empty()
    }

    /// True when a submit may be dispatched: valid and not already loading.
    #[must_use]
    pub fn can_submit(&self, state: &FormState) -> bool {
        self.is_valid(state) && !state.status.loading
    }

    /// Marks a submission as in flight.
    ///
    /// Returns `None` when gated (invalid, or a submission already in
    /// flight); the caller must not dispatch in that case. On success the
    /// previous rejection flag is cleared.
    #[must_use]
    pub fn begin_submit(&self, state: &FormState) -> Option<FormState> {
        if !self.can_submit(state) {
            return None;
        }
        let mut next = state.clone();
        next.status.loading = true;
        next.status.error = false;
        Some(next)
    }

    /// Records the outcome of a finished submission.
    ///
    /// Clears the in-flight flag; a [`SubmitOutcome::Rejected`] outcome sets
    /// `status.error` so the caller can show a failure notice and allow
    /// retry. Retries are unbounded and caller-driven; the engine carries no
    /// backoff policy.
    #[must_use]
    pub fn resolve_submit(&self, state: &FormState, outcome: SubmitOutcome) -> FormState {
        let mut next = state.clone();
        next.status.loading = false;
        next.status.error = matches!(outcome, SubmitOutcome::Rejected);
        next
    }

    /// Interaction phase of one field.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownField`] for undeclared keys.
    pub fn field_phase(&self, state: &FormState, key: &str) -> Result<FieldPhase, FormError> {
        if !self.config.declares(key) {
            return Err(FormError::UnknownField {
                key: key.to_string(),
            });
        }
        if !state.touched.contains(key) {
            return Ok(FieldPhase::Pristine);
        }
        if state.status.invalid_fields.iter().any(|k| k == key) {
            Ok(FieldPhase::Invalid)
        } else {
            Ok(FieldPhase::Valid)
        }
    }

    /// Runs every visible field's validators against `values`.
    ///
    /// Hidden fields are skipped entirely: their validators do not count
    /// toward aggregate validity. A panicking validator is logged and
    /// recorded as a failure (fail-closed).
    fn validate(&self, values: &FormValues) -> (Vec<String>, BTreeMap<String, Vec<String>>) {
        let mut invalid_fields = Vec::new();
        let mut violations = BTreeMap::new();

        for field in self.config.fields() {
            if !field.is_visible(values) {
                continue;
            }
            let value = values
                .get(&field.state_key)
                .cloned()
                .unwrap_or(FieldValue::Unset);

            let mut failed = Vec::new();
            for validator in &field.validators {
                match validator.run(&value, values) {
                    ValidatorOutcome::Pass => {}
                    ValidatorOutcome::Fail => failed.push(validator.name().to_string()),
                    ValidatorOutcome::Fault => {
                        let fault = FormError::ValidatorFault {
                            key: field.state_key.clone(),
                            validator: validator.name().to_string(),
                        };
                        tracing::error!(error = %fault, "validator fault; field treated as invalid");
                        failed.push(validator.name().to_string());
                    }
                }
            }
            if !failed.is_empty() {
                invalid_fields.push(field.state_key.clone());
                violations.insert(field.state_key.clone(), failed);
            }
        }
        (invalid_fields, violations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
