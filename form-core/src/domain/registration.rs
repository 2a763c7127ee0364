//! Registration form fields and records.
//!
//! The wire names (`nom`, `prenom`, `email`, `dateNaissance`, `cp`,
//! `ville`) are shared by the form markup, the stored JSON, and the API
//! payloads, so every serde contract in this module sticks to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fields collected by the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Family name.
    Nom,
    /// Given name.
    Prenom,
    /// Email address.
    Email,
    /// Birth date, ISO `YYYY-MM-DD`.
    DateNaissance,
    /// French postal code.
    Cp,
    /// City of residence.
    Ville,
}

impl Field {
    /// Every form field, in display order.
    pub const ALL: [Self; 6] = [
        Self::Nom,
        Self::Prenom,
        Self::Email,
        Self::DateNaissance,
        Self::Cp,
        Self::Ville,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nom => "nom",
            Self::Prenom => "prenom",
            Self::Email => "email",
            Self::DateNaissance => "dateNaissance",
            Self::Cp => "cp",
            Self::Ville => "ville",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing a field name outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {name}")]
pub struct UnknownFieldError {
    /// The rejected field name.
    pub name: String,
}

impl FromStr for Field {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownFieldError {
                name: value.to_owned(),
            })
    }
}

/// Raw form payload as the user typed it.
///
/// Values stay untouched [`serde_json::Value`]s so the type rules remain
/// reachable for payloads arriving as JSON rather than keystrokes. Missing
/// keys deserialise to the initial empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationDraft {
    nom: Value,
    prenom: Value,
    email: Value,
    date_naissance: Value,
    cp: Value,
    ville: Value,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            nom: empty(),
            prenom: empty(),
            email: empty(),
            date_naissance: empty(),
            cp: empty(),
            ville: empty(),
        }
    }
}

const fn empty() -> Value {
    Value::String(String::new())
}

impl RegistrationDraft {
    /// Raw value currently held for `field`.
    #[must_use]
    pub const fn value(&self, field: Field) -> &Value {
        match field {
            Field::Nom => &self.nom,
            Field::Prenom => &self.prenom,
            Field::Email => &self.email,
            Field::DateNaissance => &self.date_naissance,
            Field::Cp => &self.cp,
            Field::Ville => &self.ville,
        }
    }

    /// Replace the value held for `field`.
    pub fn set(&mut self, field: Field, value: Value) {
        match field {
            Field::Nom => self.nom = value,
            Field::Prenom => self.prenom = value,
            Field::Email => self.email = value,
            Field::DateNaissance => self.date_naissance = value,
            Field::Cp => self.cp = value,
            Field::Ville => self.ville = value,
        }
    }

    /// Extract the submitted strings, if every field holds one.
    ///
    /// Values are taken verbatim: the stored entry keeps whatever spacing
    /// the user typed, even though validation ran on trimmed copies.
    #[must_use]
    pub fn to_registration(&self) -> Option<Registration> {
        Some(Registration {
            nom: self.nom.as_str()?.to_owned(),
            prenom: self.prenom.as_str()?.to_owned(),
            email: self.email.as_str()?.to_owned(),
            date_naissance: self.date_naissance.as_str()?.to_owned(),
            cp: self.cp.as_str()?.to_owned(),
            ville: self.ville.as_str()?.to_owned(),
        })
    }
}

/// A submitted registration entry.
///
/// Instances exist once every rule has passed; the record round-trips the
/// JSON shape used by the storage and API back ends. Unknown keys from
/// richer back ends are ignored on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    nom: String,
    prenom: String,
    email: String,
    date_naissance: String,
    cp: String,
    ville: String,
}

impl Registration {
    /// Assemble a record from already-validated parts.
    #[must_use]
    pub fn new(
        nom: impl Into<String>,
        prenom: impl Into<String>,
        email: impl Into<String>,
        date_naissance: impl Into<String>,
        cp: impl Into<String>,
        ville: impl Into<String>,
    ) -> Self {
        Self {
            nom: nom.into(),
            prenom: prenom.into(),
            email: email.into(),
            date_naissance: date_naissance.into(),
            cp: cp.into(),
            ville: ville.into(),
        }
    }

    /// Family name as submitted.
    #[must_use]
    pub fn nom(&self) -> &str {
        &self.nom
    }

    /// Given name as submitted.
    #[must_use]
    pub fn prenom(&self) -> &str {
        &self.prenom
    }

    /// Email address as submitted.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Birth date as submitted, ISO `YYYY-MM-DD`.
    #[must_use]
    pub fn date_naissance(&self) -> &str {
        &self.date_naissance
    }

    /// Postal code as submitted.
    #[must_use]
    pub fn cp(&self) -> &str {
        &self.cp
    }

    /// City as submitted.
    #[must_use]
    pub fn ville(&self) -> &str {
        &self.ville
    }
}
