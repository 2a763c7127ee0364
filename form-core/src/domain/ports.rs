//! Ports connecting the form to its collaborators.
//!
//! The form core never talks to storage or the network itself. Hosts
//! provide an adapter for the gateway below; the browser-storage and
//! remote-API back ends of the registration page both fit the same
//! contract. Errors are strongly typed so adapters map their failures
//! into predictable variants.

use async_trait::async_trait;
use thiserror::Error;

use super::registration::Registration;

/// Failures surfaced by registration gateway adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The collaborator answered with an HTTP-like status.
    #[error("registration gateway answered with status {status}")]
    Http {
        /// Status code in HTTP semantics.
        status: u16,
        /// Message supplied by the back end, when it sent one.
        message: Option<String>,
    },
    /// The collaborator could not be reached at all.
    #[error("registration gateway unreachable: {message}")]
    Transport {
        /// Adapter description of the failure.
        message: String,
    },
}

impl GatewayError {
    /// Helper for status-only rejections.
    #[must_use]
    pub const fn http(status: u16) -> Self {
        Self::Http {
            status,
            message: None,
        }
    }

    /// Helper for rejections carrying a message from the back end.
    #[must_use]
    pub fn http_with_message(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: Some(message.into()),
        }
    }

    /// Helper for connectivity failures.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Destination for validated registrations.
///
/// # Examples
/// ```no_run
/// use async_trait::async_trait;
/// use form_core::domain::{GatewayError, Registration, RegistrationGateway};
///
/// #[derive(Default)]
/// struct MemoryGateway(std::sync::Mutex<Vec<Registration>>);
///
/// #[async_trait]
/// impl RegistrationGateway for MemoryGateway {
///     async fn create(&self, registration: &Registration) -> Result<(), GatewayError> {
///         let mut entries = self
///             .0
///             .lock()
///             .map_err(|_| GatewayError::transport("store poisoned"))?;
///         entries.push(registration.clone());
///         Ok(())
///     }
///
///     async fn list(&self) -> Result<Vec<Registration>, GatewayError> {
///         let entries = self
///             .0
///             .lock()
///             .map_err(|_| GatewayError::transport("store poisoned"))?;
///         Ok(entries.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    /// Persist a registration that passed every rule.
    async fn create(&self, registration: &Registration) -> Result<(), GatewayError>;

    /// Fetch the registrations already stored.
    async fn list(&self) -> Result<Vec<Registration>, GatewayError>;
}
