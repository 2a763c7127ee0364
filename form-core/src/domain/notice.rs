//! User-facing notices raised by the submission flow.
//!
//! A notice is the short message the registration page shows after a
//! submit attempt. Gateway failures are classified here: a client-side
//! rejection keeps the back end's own wording when it sent any, a
//! server-side failure turns into the unavailability notice, anything
//! else falls back to the generic one.

use std::fmt;

use super::ports::GatewayError;

const REGISTERED: &str = "Inscription enregistrée";
const FAILED: &str = "Erreur lors de l'inscription";
const SERVICE_UNAVAILABLE: &str = "Serveur indisponible, veuillez réessayer plus tard.";

/// Outcome message displayed after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The registration was stored.
    Registered,
    /// The back end rejected the registration with its own wording.
    Rejected(String),
    /// The back end reported a server-side failure.
    ServiceUnavailable,
    /// The submission failed for any other reason.
    Failed,
}

impl Notice {
    /// Classify a gateway failure into the notice shown to the user.
    #[must_use]
    pub fn from_gateway_error(error: &GatewayError) -> Self {
        match error {
            GatewayError::Http {
                status,
                message: Some(text),
            } if (400..500).contains(status) => Self::Rejected(text.clone()),
            GatewayError::Http { status, .. } if *status >= 500 => Self::ServiceUnavailable,
            GatewayError::Http { .. } | GatewayError::Transport { .. } => Self::Failed,
        }
    }

    /// Text of the notice.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Registered => REGISTERED,
            Self::Rejected(text) => text,
            Self::ServiceUnavailable => SERVICE_UNAVAILABLE,
            Self::Failed => FAILED,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.message())
    }
}
