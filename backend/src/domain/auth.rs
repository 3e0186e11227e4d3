//! Authentication primitives: plaintext passwords, stored digests and login
//! credentials.
//!
//! Plaintext only ever lives inside [`Password`], which wipes its buffer on
//! drop and never prints its contents.

use std::fmt;

use zeroize::Zeroizing;

use super::validation::{ValidationError, validate_string_length};

/// Maximum accepted password length in characters.
pub const PASSWORD_MAX: usize = 128;

/// Caller-supplied plaintext password.
///
/// ## Invariants
/// - Non-empty and at most [`PASSWORD_MAX`] characters. Whitespace is kept
///   verbatim so comparisons are never surprising.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and wrap a plaintext password.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = Zeroizing::new(value.into());
        if value.is_empty() {
            return Err(ValidationError::Required { field: "password" });
        }
        validate_string_length(&value, "password", PASSWORD_MAX, false)?;
        Ok(Self(value))
    }

    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Encoded password digest as produced by a password hasher.
///
/// The entity holding it never exposes it outside the domain.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded digest produced by a hasher adapter.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded representation for adapters that need to verify it.
    pub fn encoded(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Validated login credentials used by the login service.
///
/// # Examples
/// ```
/// use hbnb_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Alice@Example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "Alice@Example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs, trimming the email.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::Required { field: "email" });
        }
        Ok(Self {
            email: email.to_owned(),
            password: Password::new(password)?,
        })
    }

    /// Submitted email, trimmed.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Submitted password.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "email")]
    #[case("   ", "pw", "email")]
    #[case("a@b.io", "", "password")]
    fn invalid_credentials(#[case] email: &str, #[case] password: &str, #[case] field: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn password_keeps_whitespace() {
        let password = Password::new(" spaced ").expect("valid password");
        assert_eq!(password.expose(), " spaced ");
    }

    #[rstest]
    fn password_rejects_overlong_input() {
        let err = Password::new("x".repeat(PASSWORD_MAX + 1)).expect_err("too long");
        assert_eq!(err.code(), "too_long");
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let creds = LoginCredentials::try_from_parts("a@b.io", "hunter2").expect("valid");
        let digest = PasswordDigest::from_encoded("$2b$04$saltsaltsaltsaltsaltsa");
        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{digest:?}").contains("saltsalt"));
    }
}
