//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to turn credentials into an [`Actor`] without
//! knowing how users are stored or passwords are checked.

use async_trait::async_trait;

use crate::domain::{Actor, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated subject.
    ///
    /// Every mismatch is `Unauthorized` with the same message.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error>;
}
