//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};

use super::auth::{Password, PasswordDigest};
use super::entity::{Entity, Patch};
use super::ports::{PasswordHashError, PasswordHasher};
use super::validation::{ValidationError, validate_email, validate_string_length};
use super::{Timestamps, UserId};

/// Maximum length of first and last names.
pub const NAME_MAX: usize = 50;

/// Syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an address. Blank input is `Required`, anything else that
    /// fails the pattern is `InvalidEmail`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Required { field: "email" });
        }
        if !validate_email(&value) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self(value))
    }

    /// Borrow the address as entered.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered platform user.
///
/// ## Invariants
/// - `first_name` and `last_name` are 1..=50 characters and not blank.
/// - `email` is well formed. Global uniqueness is a storage concern.
/// - The password digest never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    email: EmailAddress,
    password_digest: PasswordDigest,
    is_admin: bool,
    timestamps: Timestamps,
}

impl User {
    /// Build a regular (non-admin) user, validating every field.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_digest: PasswordDigest,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_name(&first_name, "first_name")?;
        validate_name(&last_name, "last_name")?;
        Ok(Self {
            id: UserId::random(),
            first_name,
            last_name,
            email: EmailAddress::new(email)?,
            password_digest,
            is_admin: false,
            timestamps: Timestamps::new(now),
        })
    }

    /// Rebuild a stored user, re-checking every field rule.
    pub fn restore(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_digest: PasswordDigest,
        is_admin: bool,
        timestamps: Timestamps,
    ) -> Result<Self, ValidationError> {
        let mut user = Self::new(
            first_name,
            last_name,
            email,
            password_digest,
            timestamps.created_at(),
        )?;
        user.id = id;
        user.is_admin = is_admin;
        user.timestamps = timestamps;
        Ok(user)
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Login address, unique across users.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored digest, for persistence adapters only.
    pub(crate) fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }

    /// Whether the user holds the administrator role.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    /// Latest modification instant.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// Replace the given name, validating length.
    pub fn set_first_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        validate_name(&value, "first_name")?;
        self.first_name = value;
        Ok(())
    }

    /// Replace the family name, validating length.
    pub fn set_last_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        validate_name(&value, "last_name")?;
        self.last_name = value;
        Ok(())
    }

    /// Replace the email address, validating its shape.
    pub fn set_email(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        self.email = EmailAddress::new(value)?;
        Ok(())
    }

    /// Grant or revoke the administrator role.
    pub fn set_admin(&mut self, is_admin: bool) {
        self.is_admin = is_admin;
    }

    /// Replace the stored digest with one derived from `password`.
    pub fn set_password(
        &mut self,
        hasher: &dyn PasswordHasher,
        password: &Password,
    ) -> Result<(), PasswordHashError> {
        self.password_digest = hasher.hash(password)?;
        Ok(())
    }

    /// Check a candidate plaintext against the stored digest.
    pub fn verify_password(&self, hasher: &dyn PasswordHasher, password: &Password) -> bool {
        hasher.verify(password, &self.password_digest)
    }
}

fn validate_name(value: &str, field: &'static str) -> Result<(), ValidationError> {
    validate_string_length(value, field, NAME_MAX, true)
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn entity_id(&self) -> &UserId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamps.touch(now);
    }
}

/// Stored-field changes for a user. Passwords arrive already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Digest of a new password.
    pub password_digest: Option<PasswordDigest>,
    /// New administrator flag.
    pub is_admin: Option<bool>,
}

impl Patch<User> for UserPatch {
    fn apply_to(&self, user: &mut User) -> Result<(), ValidationError> {
        if let Some(first_name) = &self.first_name {
            user.set_first_name(first_name.as_str())?;
        }
        if let Some(last_name) = &self.last_name {
            user.set_last_name(last_name.as_str())?;
        }
        if let Some(email) = &self.email {
            user.set_email(email.as_str())?;
        }
        if let Some(digest) = &self.password_digest {
            user.password_digest = digest.clone();
        }
        if let Some(is_admin) = self.is_admin {
            user.set_admin(is_admin);
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password_digest.is_none()
            && self.is_admin.is_none()
    }
}
