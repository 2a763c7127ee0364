//! Shared test doubles for registration flow tests.
//!
//! This module provides a pinned clock and an in-memory gateway for
//! both unit tests (in `src/`) and integration tests (in `tests/`).
//! It is only compiled when the `test-support` feature is enabled.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use crate::domain::{GatewayError, Registration, RegistrationGateway};

/// Clock pinned to a single instant.
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Create a clock that always reports `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory registration gateway with armable failures.
#[derive(Default)]
pub struct InMemoryGateway {
    seeded: Vec<Registration>,
    created: Mutex<Vec<Registration>>,
    create_failure: Mutex<Option<GatewayError>>,
    list_failure: Mutex<Option<GatewayError>>,
}

impl InMemoryGateway {
    /// Gateway whose listing starts from the given registrations.
    #[must_use]
    pub fn with_existing(seeded: Vec<Registration>) -> Self {
        Self {
            seeded,
            ..Self::default()
        }
    }

    /// Make every `create` call answer with `error`.
    pub fn fail_create_with(&self, error: GatewayError) {
        *lock(&self.create_failure) = Some(error);
    }

    /// Make every `list` call answer with `error`.
    pub fn fail_list_with(&self, error: GatewayError) {
        *lock(&self.list_failure) = Some(error);
    }

    /// Registrations accepted by `create` so far.
    #[must_use]
    pub fn created(&self) -> Vec<Registration> {
        lock(&self.created).clone()
    }
}

#[async_trait]
impl RegistrationGateway for InMemoryGateway {
    async fn create(&self, registration: &Registration) -> Result<(), GatewayError> {
        if let Some(error) = lock(&self.create_failure).clone() {
            return Err(error);
        }
        lock(&self.created).push(registration.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Registration>, GatewayError> {
        if let Some(error) = lock(&self.list_failure).clone() {
            return Err(error);
        }
        let mut entries = self.seeded.clone();
        entries.extend(lock(&self.created).iter().cloned());
        Ok(entries)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("gateway mutex"),
    }
}
