//! Port abstraction for persisting users.

use async_trait::async_trait;

use crate::domain::{User, UserId, UserPatch};

use super::PersistenceError;

/// Storage for [`User`] rows. Email addresses are unique across all rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` when the email is taken.
    async fn add(&self, user: &User) -> Result<(), PersistenceError>;

    /// Look up one user.
    async fn get(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// All users in insertion order.
    async fn get_all(&self) -> Result<Vec<User>, PersistenceError>;

    /// Exact, case-sensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError>;

    /// Apply `patch` atomically and return the stored result.
    ///
    /// Fails with `NotFound`, `Validation` or `Duplicate` (email taken by
    /// another user) and leaves the row unchanged in every failure case.
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, PersistenceError>;

    /// Remove a user together with their places and reviews.
    async fn delete(&self, id: &UserId) -> Result<(), PersistenceError>;
}
