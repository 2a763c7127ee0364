//! Registration form domain.
//!
//! Purpose: define the field rules, draft state, and submission flow of
//! the registration form as strongly typed entities. Validation
//! semantics live here and nowhere else; each type documents its
//! serialisation contract (serde) in its own Rustdoc.
//!
//! Public surface:
//! - `ValidationCode` / `ValidationFailure`: typed outcome of a field rule.
//! - `Field`, `RegistrationDraft`, `Registration`: form fields and payloads.
//! - `ValidationReport`, `FormState`: whole-form evaluation and feedback gating.
//! - `Notice`: user-facing submission outcome copy.
//! - `RegistrationGateway` / `GatewayError`: port to the storage back end.
//! - `RegistrationService`: orchestration of the registration flow.

pub mod error;
pub mod form;
pub mod notice;
pub mod ports;
pub mod registration;
pub mod registration_service;
pub mod validation;

pub use self::error::{ValidationCode, ValidationFailure, ValidationFailureDecodeError};
pub use self::form::{FormState, ValidationReport};
pub use self::notice::Notice;
pub use self::ports::{GatewayError, RegistrationGateway};
pub use self::registration::{Field, Registration, RegistrationDraft, UnknownFieldError};
pub use self::registration_service::{RegistrationService, SubmitOutcome};
pub use self::validation::{
    MINIMUM_AGE, compute_age, parse_birth_date, validate_age, validate_email, validate_identity,
    validate_postal_code, validate_unique_email,
};
