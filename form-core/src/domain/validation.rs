//! Field validation rules for the registration form.
//!
//! Every rule is a pure function over a raw JSON value: deterministic,
//! side-effect free, and total. Callers decide what to trim; the rules
//! check exactly what they are given. Failures carry a stable code and
//! the French copy shown beside the field.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use serde_json::Value;

use super::error::ValidationFailure;
use super::registration::Registration;

/// Minimum accepted age at registration, in whole years.
pub const MINIMUM_AGE: u32 = 18;

static HTML_TAG_RE: OnceLock<Regex> = OnceLock::new();
static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static POSTAL_CODE_RE: OnceLock<Regex> = OnceLock::new();

fn html_tag_regex() -> &'static Regex {
    HTML_TAG_RE.get_or_init(|| {
        Regex::new("<[^>]*>")
            .unwrap_or_else(|error| panic!("HTML tag regex failed to compile: {error}"))
    })
}

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // ASCII letters plus the Latin-1 accented ranges, hyphen, and space.
        let pattern = "^[A-Za-zÀ-ÖØ-öø-ÿ\\- ]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately loose: no whitespace, a single @, a dot in the domain.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn postal_code_regex() -> &'static Regex {
    POSTAL_CODE_RE.get_or_init(|| {
        // [0-9] rather than \d so non-ASCII digits stay rejected.
        let pattern = "^[0-9]{5}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("postal code regex failed to compile: {error}"))
    })
}

/// Check a name-bearing field (`nom`, `prenom`, `ville`).
///
/// Rules apply in order: the value must be a string, must be free of HTML
/// tag-like content, and must stay within the accepted alphabet (letters,
/// Latin-1 accents, hyphens, spaces). A value breaking several rules
/// reports the first, so HTML wins over stray punctuation.
///
/// # Errors
///
/// `INVALID_TYPE`, `XSS_DETECTED`, or `INVALID_NAME`, in that order of
/// precedence.
pub fn validate_identity(value: &Value) -> Result<(), ValidationFailure> {
    let Some(text) = value.as_str() else {
        return Err(ValidationFailure::identity_not_text());
    };
    if html_tag_regex().is_match(text) {
        return Err(ValidationFailure::xss_detected());
    }
    if !name_regex().is_match(text) {
        return Err(ValidationFailure::invalid_name());
    }
    Ok(())
}

/// Check the email field.
///
/// # Errors
///
/// `INVALID_TYPE` for non-string values, `INVALID_EMAIL` for text that
/// does not look like an address.
pub fn validate_email(value: &Value) -> Result<(), ValidationFailure> {
    let Some(text) = value.as_str() else {
        return Err(ValidationFailure::email_not_text());
    };
    if !email_regex().is_match(text) {
        return Err(ValidationFailure::invalid_email());
    }
    Ok(())
}

/// Check the postal code field against the five-digit French format.
///
/// # Errors
///
/// `INVALID_TYPE` for non-string values, `INVALID_POSTAL_CODE` otherwise.
pub fn validate_postal_code(value: &Value) -> Result<(), ValidationFailure> {
    let Some(text) = value.as_str() else {
        return Err(ValidationFailure::postal_not_text());
    };
    if !postal_code_regex().is_match(text) {
        return Err(ValidationFailure::invalid_postal_code());
    }
    Ok(())
}

/// Read a birth date from its raw form value.
///
/// Only strings in the canonical `YYYY-MM-DD` shape parse: zero-padded
/// components and no whitespace anywhere. Anything else is the
/// invalid-date sentinel (`None`) that [`validate_age`] reports.
#[must_use]
pub fn parse_birth_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?;
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    // chrono accepts stray whitespace and unpadded numbers, so the input
    // must also match the canonical rendering.
    (date.format("%Y-%m-%d").to_string() == text).then_some(date)
}

/// Age in whole years under the epoch-relative reading.
///
/// The span between birth (at midnight UTC) and `now` is reinterpreted as
/// an instant after the Unix epoch, and the year distance from 1970 is the
/// age. An 18th birthday today therefore counts as 18; one day short does
/// not. The distance is absolute, so a birth date in the future still
/// yields a positive age. Returns `None` when the span cannot be
/// represented, which takes a birth date hundreds of millennia away.
#[must_use]
pub fn compute_age(birth: NaiveDate, now: DateTime<Utc>) -> Option<u32> {
    let birth_instant = birth.and_hms_opt(0, 0, 0)?.and_utc();
    let elapsed = now.signed_duration_since(birth_instant);
    let as_instant = DateTime::<Utc>::from_timestamp_millis(elapsed.num_milliseconds())?;
    Some(as_instant.year().abs_diff(1970))
}

/// Check the birth date and return the age in whole years.
///
/// # Errors
///
/// The invalid-date sentinel reports `INVALID_DATE`; an age below
/// [`MINIMUM_AGE`] reports `UNDERAGE`.
pub fn validate_age(
    birth: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<u32, ValidationFailure> {
    let date = birth.ok_or_else(ValidationFailure::invalid_date)?;
    let age = compute_age(date, now).ok_or_else(ValidationFailure::invalid_date)?;
    if age < MINIMUM_AGE {
        return Err(ValidationFailure::underage());
    }
    Ok(age)
}

/// Check the email against already-stored registrations.
///
/// The comparison is case-sensitive and runs on the raw value: only an
/// exact match counts as a duplicate. Non-string values match nothing.
///
/// # Errors
///
/// `DUPLICATE_EMAIL` when a stored registration holds the same address.
pub fn validate_unique_email(
    value: &Value,
    existing: &[Registration],
) -> Result<(), ValidationFailure> {
    let is_taken = value
        .as_str()
        .is_some_and(|candidate| existing.iter().any(|entry| entry.email() == candidate));
    if is_taken {
        return Err(ValidationFailure::duplicate_email());
    }
    Ok(())
}
