//! Registration flow orchestration.
//!
//! This module drives the form against a gateway: it keeps the draft
//! and the stored registrations together, runs the field rules on
//! demand, and turns submission results into notices. The clock is
//! injected so age checks stay deterministic under test.

use std::sync::Arc;

use mockable::Clock;
use serde_json::Value;
use tracing::{info, warn};

use super::error::ValidationFailure;
use super::form::{FormState, ValidationReport, evaluate};
use super::notice::Notice;
use super::ports::RegistrationGateway;
use super::registration::{Field, Registration};

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The registration passed every rule and was stored.
    Accepted,
    /// The draft failed validation; nothing left the service.
    Rejected,
    /// The gateway refused or could not be reached.
    Failed,
}

/// Drives a registration form against a gateway.
#[derive(Clone)]
pub struct RegistrationService<G> {
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
    form: FormState,
    existing: Vec<Registration>,
    notice: Option<Notice>,
}

impl<G> RegistrationService<G> {
    /// Create a service over the given gateway and clock.
    #[must_use]
    pub fn new(gateway: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway,
            clock,
            form: FormState::default(),
            existing: Vec::new(),
            notice: None,
        }
    }

    /// Record a new value for a field.
    pub fn edit(&mut self, field: Field, value: Value) {
        self.form.edit(field, value);
    }

    /// Mark a field as visited.
    pub fn touch(&mut self, field: Field) {
        self.form.touch(field);
    }

    /// Validate the current draft against the known registrations.
    #[must_use]
    pub fn report(&self) -> ValidationReport {
        evaluate(self.form.draft(), &self.existing, self.clock.utc())
    }

    /// Whether the current draft passes every rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report().is_valid()
    }

    /// Failure to surface for a field, honouring the feedback gating.
    ///
    /// Fields that were never visited and never edited stay silent even
    /// when invalid, so a pristine form shows no errors.
    #[must_use]
    pub fn visible_failure(&self, field: Field) -> Option<ValidationFailure> {
        if self.form.shows_feedback(field) {
            self.report().failure(field)
        } else {
            None
        }
    }

    /// Start a fresh registration attempt, dismissing any stale notice.
    pub fn begin_registration(&mut self) {
        self.notice = None;
    }

    /// Current state of the form.
    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// Registrations the service currently knows about.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.existing
    }

    /// Notice raised by the latest submission attempt, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

impl<G> RegistrationService<G>
where
    G: RegistrationGateway,
{
    /// Fetch the registrations already stored.
    ///
    /// A gateway failure leaves the service with an empty roster rather
    /// than surfacing an error; the uniqueness rule then has nothing to
    /// compare against.
    pub async fn load_existing(&mut self) {
        match self.gateway.list().await {
            Ok(entries) => self.existing = entries,
            Err(error) => {
                warn!(error = %error, "loading existing registrations failed");
                self.existing = Vec::new();
            }
        }
    }

    /// Submit the current draft.
    ///
    /// An invalid draft is rejected without touching the gateway or the
    /// form. On success the registration joins the roster, the form
    /// resets, and the success notice is raised. On gateway failure the
    /// draft is kept so the user can retry.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.is_valid() {
            return SubmitOutcome::Rejected;
        }
        let Some(registration) = self.form.draft().to_registration() else {
            return SubmitOutcome::Rejected;
        };
        match self.gateway.create(&registration).await {
            Ok(()) => {
                self.existing.push(registration);
                self.notice = Some(Notice::Registered);
                self.form.reset();
                info!(total = self.existing.len(), "registration stored");
                SubmitOutcome::Accepted
            }
            Err(error) => {
                warn!(error = %error, "registration submission failed");
                self.notice = Some(Notice::from_gateway_error(&error));
                SubmitOutcome::Failed
            }
        }
    }
}
