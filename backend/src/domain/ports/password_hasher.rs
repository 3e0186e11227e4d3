//! Port for deriving and checking password digests.

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        Unavailable { message: String } => "password hashing unavailable: {message}",
    }
}

/// One-way password transformation.
///
/// Implementations salt every digest and compare in constant time.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Digest `password` under a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError>;

    /// Malformed digests never verify.
    fn verify(&self, password: &Password, digest: &PasswordDigest) -> bool;
}
