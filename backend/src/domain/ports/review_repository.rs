//! Port abstraction for persisting reviews.

use async_trait::async_trait;

use crate::domain::{PlaceId, Review, ReviewId, ReviewPatch, UserId};

use super::PersistenceError;

/// Storage for [`Review`] rows.
///
/// At most one review exists per `(user_id, place_id)` pair, and every review
/// points at an existing place and author. `add` enforces both atomically
/// with the insert, so a place deleted concurrently can never gain a review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Fails with `Duplicate` for a second review of the same place by the
    /// same author, and with `MissingReference` when the place or author is
    /// gone.
    async fn add(&self, review: &Review) -> Result<(), PersistenceError>;

    /// Look up one review.
    async fn get(&self, id: &ReviewId) -> Result<Option<Review>, PersistenceError>;

    /// All reviews in creation order.
    async fn get_all(&self) -> Result<Vec<Review>, PersistenceError>;

    /// Reviews of one place in creation order.
    async fn list_by_place(&self, place_id: &PlaceId) -> Result<Vec<Review>, PersistenceError>;

    /// Reviews by one author in creation order.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Review>, PersistenceError>;

    /// The single review an author wrote for a place.
    async fn find_by_user_and_place(
        &self,
        user_id: &UserId,
        place_id: &PlaceId,
    ) -> Result<Option<Review>, PersistenceError>;

    /// Apply `patch` and advance `updated_at`; unknown ids are `NotFound`.
    async fn update(&self, id: &ReviewId, patch: &ReviewPatch)
    -> Result<Review, PersistenceError>;

    /// Remove one review.
    async fn delete(&self, id: &ReviewId) -> Result<(), PersistenceError>;
}
