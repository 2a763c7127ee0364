//! Form evaluation and interaction state.
//!
//! Mirrors the behaviour of the browser form: validation reruns over the
//! whole draft on demand, feedback for a field stays hidden until the user
//! has visited or filled it, and submission is refused while any rule
//! fails.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationFailure;
use super::registration::{Field, Registration, RegistrationDraft};
use super::validation::{
    parse_birth_date, validate_age, validate_email, validate_identity, validate_postal_code,
    validate_unique_email,
};

/// Failures recorded for a draft, keyed by field.
///
/// Absence means the field passed. A report is rebuilt by every evaluation
/// and never retained across edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    failures: BTreeMap<Field, ValidationFailure>,
}

impl ValidationReport {
    /// True when no field failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure recorded for `field`, if any.
    #[must_use]
    pub fn failure(&self, field: Field) -> Option<ValidationFailure> {
        self.failures.get(&field).copied()
    }

    /// Failing fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, ValidationFailure)> + '_ {
        self.failures
            .iter()
            .map(|(field, failure)| (*field, *failure))
    }

    fn record(&mut self, field: Field, outcome: Result<(), ValidationFailure>) {
        if let Err(failure) = outcome {
            self.failures.insert(field, failure);
        }
    }
}

/// Run every field rule against `draft`.
///
/// String values are trimmed before validation even though stored
/// submissions keep the untrimmed originals. The uniqueness rule only runs
/// once the email format has passed, and compares the raw value against
/// `existing`. Fields never depend on each other beyond that.
#[must_use]
pub fn evaluate(
    draft: &RegistrationDraft,
    existing: &[Registration],
    now: DateTime<Utc>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    for field in Field::ALL {
        let raw = draft.value(field);
        match field {
            Field::Nom | Field::Prenom | Field::Ville => {
                report.record(field, validate_identity(&trimmed(raw)));
            }
            Field::Email => {
                let outcome = validate_email(&trimmed(raw))
                    .and_then(|()| validate_unique_email(raw, existing));
                report.record(field, outcome);
            }
            Field::Cp => {
                report.record(field, validate_postal_code(&trimmed(raw)));
            }
            Field::DateNaissance => {
                let outcome = validate_age(parse_birth_date(raw), now).map(|_| ());
                report.record(field, outcome);
            }
        }
    }
    report
}

/// Copy of `value` with surrounding whitespace removed from strings.
fn trimmed(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.trim().to_owned()),
        other => other.clone(),
    }
}

/// Interaction state of the registration form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: RegistrationDraft,
    touched: BTreeSet<Field>,
}

impl FormState {
    /// Record a keystroke: replace the value held for `field`.
    pub fn edit(&mut self, field: Field, value: Value) {
        self.draft.set(field, value);
    }

    /// Record that the user visited and left `field`.
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    /// True once `field` has been visited.
    #[must_use]
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// The raw values as currently typed.
    #[must_use]
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Whether feedback for `field` may be shown.
    ///
    /// Feedback stays hidden until the field has been visited or edited
    /// away from its initial empty string.
    #[must_use]
    pub fn shows_feedback(&self, field: Field) -> bool {
        self.is_touched(field) || is_edited(self.draft.value(field))
    }

    /// Restore the initial empty values and forget visited fields.
    pub fn reset(&mut self) {
        self.draft = RegistrationDraft::default();
        self.touched.clear();
    }
}

fn is_edited(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}
