//! Field-level validation failures shared by the entity constructors.
//!
//! Constructors collect every violation instead of stopping at the first so a
//! client can fix a payload in one round trip. The HTTP adapter renders the
//! collection under `details.errors`.

use std::fmt;

use serde::Serialize;
use serde_json::json;

use crate::domain::Error;

/// Machine-readable violation codes.
pub mod codes {
    /// A required field is absent or null.
    pub const REQUIRED: &str = "required";
    /// A string is shorter than its minimum length.
    pub const TOO_SHORT: &str = "too_short";
    /// A string is longer than its maximum length.
    pub const TOO_LONG: &str = "too_long";
    /// A number lies outside its allowed range.
    pub const OUT_OF_RANGE: &str = "out_of_range";
    /// A value is not part of the enumeration.
    pub const INVALID_ENUM: &str = "invalid_enum";
    /// A list that must hold at least one entry is empty.
    pub const EMPTY_LIST: &str = "empty_list";
    /// A string is not an absolute URL.
    pub const INVALID_URL: &str = "invalid_url";
    /// A reference is not a well-formed identifier.
    pub const INVALID_ID: &str = "invalid_id";
    /// A reference does not resolve to a stored record.
    pub const UNKNOWN_REFERENCE: &str = "unknown_reference";
    /// A uniqueness constraint would be violated.
    pub const DUPLICATE: &str = "duplicate";
    /// The value has the wrong JSON type.
    pub const INVALID_TYPE: &str = "invalid_type";
}

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldViolation {
    /// Build a violation for the wire-level `field` name.
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Violation for an absent required field.
    pub fn required(field: &'static str) -> Self {
        Self::new(field, codes::REQUIRED, format!("{field} is required"))
    }

    /// Wire-level field name, in camelCase.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Machine-readable violation code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every violation found while validating one payload.
///
/// # Examples
/// ```
/// use civic_backend::domain::{FieldViolation, ValidationErrors};
///
/// let mut errors = ValidationErrors::default();
/// errors.push(FieldViolation::required("role"));
/// assert!(errors.has_field("role"));
/// assert!(errors.finish(()).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Wrap a single violation.
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// Record a violation.
    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    /// Record the violation of a failed check and pass a success through.
    pub fn capture<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(violation);
                None
            }
        }
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Recorded violations in discovery order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(FieldViolation::message).collect();
        if messages.is_empty() {
            f.write_str("validation failed")
        } else {
            f.write_str(&messages.join("; "))
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<FieldViolation> for ValidationErrors {
    fn from(value: FieldViolation) -> Self {
        Self::single(value)
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "errors": value.violations,
        }))
    }
}

/// Requested change to one field of a stored record.
///
/// Distinguishes a field left out of a partial update from one explicitly set
/// to `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldUpdate<T> {
    /// The field was not part of the update.
    #[default]
    Unchanged,
    /// The field was explicitly set to `null`.
    Cleared,
    /// The field was given a new value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Whether the update leaves the field alone.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl<T> From<Option<Option<T>>> for FieldUpdate<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Unchanged,
            Some(None) => Self::Cleared,
            Some(Some(inner)) => Self::Set(inner),
        }
    }
}

/// Validate a required string's length in characters.
pub(crate) fn bounded_text(
    field: &'static str,
    value: String,
    min: usize,
    max: usize,
) -> Result<String, FieldViolation> {
    let length = value.chars().count();
    if length == 0 {
        return Err(FieldViolation::required(field));
    }
    if length < min {
        return Err(FieldViolation::new(
            field,
            codes::TOO_SHORT,
            format!("{field} must be at least {min} characters"),
        ));
    }
    if length > max {
        return Err(FieldViolation::new(
            field,
            codes::TOO_LONG,
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(value)
}

/// Validate that a number lies inside an inclusive range.
pub(crate) fn bounded_number(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, FieldViolation> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldViolation::new(
            field,
            codes::OUT_OF_RANGE,
            format!("{field} must be between {min} and {max}"),
        ))
    }
}
