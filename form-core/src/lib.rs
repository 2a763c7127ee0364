//! Registration form core.
//!
//! Models the registration page: per-field validation rules, draft and
//! feedback state, and the submission flow against a storage gateway.
//! Hosts adapt the gateway port to whatever back end they talk to.

pub mod domain;

#[cfg(feature = "test-support")]
pub mod test_support;
