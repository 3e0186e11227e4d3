//! Field validators shared by every entity.
//!
//! Validators only check shape and range. Who may change a field is decided
//! by the facade.

use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::Error;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: String },
    #[error("{field} must not exceed {max}")]
    AboveMaximum { field: &'static str, max: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("email must be a valid address")]
    InvalidEmail,
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::NotPositive { field }
            | Self::NotFinite { field } => field,
            Self::InvalidEmail => "email",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::TooLong { .. } => "too_long",
            Self::BelowMinimum { .. } => "below_minimum",
            Self::AboveMaximum { .. } => "above_maximum",
            Self::NotPositive { .. } => "not_positive",
            Self::NotFinite { .. } => "not_finite",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        }))
    }
}

/// Check presence and length of a string field.
///
/// Length is counted in characters. A required field fails when empty or
/// whitespace-only.
///
/// # Examples
/// ```
/// use hbnb_backend::domain::validation::validate_string_length;
///
/// assert!(validate_string_length("Ada", "first_name", 50, true).is_ok());
/// assert!(validate_string_length("   ", "first_name", 50, true).is_err());
/// assert!(validate_string_length("", "description", 50, false).is_ok());
/// ```
pub fn validate_string_length(
    value: &str,
    field: &'static str,
    max_length: usize,
    required: bool,
) -> Result<(), ValidationError> {
    if required {
        validate_required(value, field)?;
    }
    if value.chars().count() > max_length {
        return Err(ValidationError::TooLong {
            field,
            max: max_length,
        });
    }
    Ok(())
}

/// Check that a string field carries at least one non-whitespace character.
pub fn validate_required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Check that a value lies within the inclusive bounds supplied.
///
/// Either bound may be omitted.
pub fn validate_number_range<T>(
    value: T,
    field: &'static str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ValidationError>
where
    T: PartialOrd + Display + Copy,
{
    if let Some(min) = min.filter(|min| value < *min) {
        return Err(ValidationError::BelowMinimum {
            field,
            min: min.to_string(),
        });
    }
    if let Some(max) = max.filter(|max| value > *max) {
        return Err(ValidationError::AboveMaximum {
            field,
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Reject NaN and infinite values before range checks run.
pub fn validate_finite(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

/// Require a strictly positive, finite number.
pub fn validate_positive(value: f64, field: &'static str) -> Result<(), ValidationError> {
    validate_finite(value, field)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Conservative `local@domain.tld` format check. Says nothing about
/// deliverability.
pub fn validate_email(value: &str) -> bool {
    email_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", true, Some(ValidationError::Required { field: "name" }))]
    #[case(" \t ", true, Some(ValidationError::Required { field: "name" }))]
    #[case("", false, None)]
    #[case("Wifi", true, None)]
    #[case("abcdefghijk", true, Some(ValidationError::TooLong { field: "name", max: 10 }))]
    #[case("abcdefghij", true, None)]
    fn string_length_rules(
        #[case] value: &str,
        #[case] required: bool,
        #[case] expected: Option<ValidationError>,
    ) {
        let result = validate_string_length(value, "name", 10, required);
        assert_eq!(result.err(), expected);
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        assert!(validate_string_length("éééé", "name", 4, true).is_ok());
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    fn number_range_is_inclusive(#[case] rating: i64, #[case] valid: bool) {
        let result = validate_number_range(rating, "rating", Some(1), Some(5));
        assert_eq!(result.is_ok(), valid);
    }

    #[rstest]
    fn number_range_bounds_are_independent() {
        assert!(validate_number_range(-1000.0, "latitude", None, Some(90.0)).is_ok());
        assert!(validate_number_range(1000.0, "latitude", Some(-90.0), None).is_ok());
    }

    #[rstest]
    #[case(f64::NAN, Some("not_finite"))]
    #[case(f64::INFINITY, Some("not_finite"))]
    #[case(0.0, Some("not_positive"))]
    #[case(-3.5, Some("not_positive"))]
    #[case(0.01, None)]
    fn positive_rules(#[case] value: f64, #[case] expected: Option<&str>) {
        let result = validate_positive(value, "price");
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[case("alice@example.com", true)]
    #[case("a.b+tag@sub.example.co", true)]
    #[case("alice@example", false)]
    #[case("alice@example.c", false)]
    #[case("alice.example.com", false)]
    #[case("alice@exa mple.com", false)]
    #[case("", false)]
    fn email_format(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(validate_email(email), valid);
    }

    #[rstest]
    fn converts_into_invalid_request_with_details() {
        let error: Error = ValidationError::TooLong {
            field: "title",
            max: 100,
        }
        .into();

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "title must not exceed 100 characters");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "title", "code": "too_long" }))
        );
    }
}
