//! Validation failure payloads.
//!
//! Failures are transport agnostic. Hosts map them to inline form feedback,
//! JSON envelopes, or any other rendering they need. Every failure pairs a
//! stable machine-readable code with the fixed French copy shown beside the
//! field, and the pairing survives serialisation unchanged.

use serde::{Deserialize, Serialize};

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    /// The raw value has the wrong JSON type for its field.
    InvalidType,
    /// The birth date is missing or not a readable calendar date.
    InvalidDate,
    /// The computed age is below the minimum.
    Underage,
    /// The postal code is not exactly five digits.
    InvalidPostalCode,
    /// The value contains HTML tag-like content.
    XssDetected,
    /// The value strays outside the accepted name alphabet.
    InvalidName,
    /// The value does not look like an email address.
    InvalidEmail,
    /// The email already belongs to a stored registration.
    DuplicateEmail,
}

impl ValidationCode {
    /// Wire spelling of the code, as stored and asserted by clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "INVALID_TYPE",
            Self::InvalidDate => "INVALID_DATE",
            Self::Underage => "UNDERAGE",
            Self::InvalidPostalCode => "INVALID_POSTAL_CODE",
            Self::XssDetected => "XSS_DETECTED",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
        }
    }
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field validation failure.
///
/// ## Invariants
/// - `message` always comes from the copy table below; arbitrary pairings
///   of code and message cannot be constructed or deserialised.
///
/// # Examples
/// ```
/// use form_core::domain::{ValidationCode, ValidationFailure};
///
/// let failure = ValidationFailure::underage();
/// assert_eq!(failure.code(), ValidationCode::Underage);
/// assert_eq!(failure.message(), "L'utilisateur doit avoir au moins 18 ans");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "ValidationFailureDto")]
pub struct ValidationFailure {
    code: ValidationCode,
    message: &'static str,
}

/// Every failure the rules can produce, used to police deserialisation.
const FAILURE_TABLE: [ValidationFailure; 10] = [
    ValidationFailure::invalid_date(),
    ValidationFailure::underage(),
    ValidationFailure::postal_not_text(),
    ValidationFailure::invalid_postal_code(),
    ValidationFailure::identity_not_text(),
    ValidationFailure::xss_detected(),
    ValidationFailure::invalid_name(),
    ValidationFailure::email_not_text(),
    ValidationFailure::invalid_email(),
    ValidationFailure::duplicate_email(),
];

impl ValidationFailure {
    /// The birth date is missing or unreadable.
    #[must_use]
    pub const fn invalid_date() -> Self {
        Self {
            code: ValidationCode::InvalidDate,
            message: "Date de naissance invalide",
        }
    }

    /// The computed age is below the minimum.
    #[must_use]
    pub const fn underage() -> Self {
        Self {
            code: ValidationCode::Underage,
            message: "L'utilisateur doit avoir au moins 18 ans",
        }
    }

    /// The postal code value is not a string.
    #[must_use]
    pub const fn postal_not_text() -> Self {
        Self {
            code: ValidationCode::InvalidType,
            message: "Le code postal doit etre une chaine de caracteres",
        }
    }

    /// The postal code is not five digits.
    #[must_use]
    pub const fn invalid_postal_code() -> Self {
        Self {
            code: ValidationCode::InvalidPostalCode,
            message: "Code postal francais invalide",
        }
    }

    /// A name-bearing value is not a string.
    #[must_use]
    pub const fn identity_not_text() -> Self {
        Self {
            code: ValidationCode::InvalidType,
            message: "Le nom ou le prenom doit etre une chaine de caracteres",
        }
    }

    /// The value contains HTML tag-like content.
    #[must_use]
    pub const fn xss_detected() -> Self {
        Self {
            code: ValidationCode::XssDetected,
            message: "Contenu HTML detecte",
        }
    }

    /// The value strays outside the accepted name alphabet.
    #[must_use]
    pub const fn invalid_name() -> Self {
        Self {
            code: ValidationCode::InvalidName,
            message: "Caracteres invalides dans le nom",
        }
    }

    /// The email value is not a string.
    #[must_use]
    pub const fn email_not_text() -> Self {
        Self {
            code: ValidationCode::InvalidType,
            message: "L'email doit etre une chaine de caracteres",
        }
    }

    /// The email does not look like an address.
    #[must_use]
    pub const fn invalid_email() -> Self {
        Self {
            code: ValidationCode::InvalidEmail,
            message: "Format d'email invalide",
        }
    }

    /// The email already belongs to a stored registration.
    #[must_use]
    pub const fn duplicate_email() -> Self {
        Self {
            code: ValidationCode::DuplicateEmail,
            message: "Cet email est deja utilise",
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> ValidationCode {
        self.code
    }

    /// French copy shown beside the field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        self.message
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Raised when decoding a failure whose code and message do not pair up in
/// the copy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailureDecodeError {
    code: ValidationCode,
    message: String,
}

impl ValidationFailureDecodeError {
    /// Code carried by the rejected payload.
    #[must_use]
    pub const fn code(&self) -> ValidationCode {
        self.code
    }

    /// Message carried by the rejected payload.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationFailureDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "message {:?} does not belong to validation code {}",
            self.message, self.code
        )
    }
}

impl std::error::Error for ValidationFailureDecodeError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct ValidationFailureDto {
    code: ValidationCode,
    message: String,
}

impl From<ValidationFailure> for ValidationFailureDto {
    fn from(value: ValidationFailure) -> Self {
        Self {
            code: value.code,
            message: value.message.to_owned(),
        }
    }
}

impl TryFrom<ValidationFailureDto> for ValidationFailure {
    type Error = ValidationFailureDecodeError;

    fn try_from(value: ValidationFailureDto) -> Result<Self, Self::Error> {
        let ValidationFailureDto { code, message } = value;
        FAILURE_TABLE
            .into_iter()
            .find(|failure| failure.code == code && failure.message == message)
            .ok_or_else(|| ValidationFailureDecodeError { code, message })
    }
}

// Deriving Deserialize through `try_from` would borrow the static message
// field and pin `'de` to `'static`, so the dto hop is written out.
impl<'de> Deserialize<'de> for ValidationFailure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ValidationFailureDto::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}
