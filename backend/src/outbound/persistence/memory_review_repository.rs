//! In-memory `ReviewRepository` adapter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::ports::{PersistenceError, ReviewRepository};
use crate::domain::{PlaceId, Review, ReviewId, ReviewPatch, UserId};

use super::memory_store::{MemoryStore, missing};

/// Process-local review storage, one review per author and place.
pub struct MemoryReviewRepository {
    store: Arc<MemoryStore>,
    clock: Arc<dyn Clock>,
}

impl MemoryReviewRepository {
    /// Reviews kept in `store`, stamped by `clock`.
    pub fn new(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn add(&self, review: &Review) -> Result<(), PersistenceError> {
        let users = self.store.users.lock()?;
        let places = self.store.places.lock()?;
        let mut reviews = self.store.reviews.lock()?;
        if !places.contains(review.place_id()) {
            return Err(missing("place_id"));
        }
        if !users.contains(review.user_id()) {
            return Err(missing("user_id"));
        }
        reviews.insert(review)
    }

    async fn get(&self, id: &ReviewId) -> Result<Option<Review>, PersistenceError> {
        self.store.reviews.get(id)
    }

    async fn get_all(&self) -> Result<Vec<Review>, PersistenceError> {
        self.store.reviews.all()
    }

    async fn list_by_place(&self, place_id: &PlaceId) -> Result<Vec<Review>, PersistenceError> {
        self.store
            .reviews
            .filter(|review| review.place_id() == place_id)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Review>, PersistenceError> {
        self.store.reviews.filter(|review| review.user_id() == user_id)
    }

    async fn find_by_user_and_place(
        &self,
        user_id: &UserId,
        place_id: &PlaceId,
    ) -> Result<Option<Review>, PersistenceError> {
        self.store
            .reviews
            .find(|review| review.user_id() == user_id && review.place_id() == place_id)
    }

    async fn update(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<Review, PersistenceError> {
        let now = self.clock.utc();
        self.store.reviews.replace_with(id, |review| {
            patched(review, patch, now).map_err(PersistenceError::validation)
        })
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), PersistenceError> {
        self.store.reviews.remove(id)
    }
}
