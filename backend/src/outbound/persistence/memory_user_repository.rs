//! In-memory `UserRepository` adapter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{PlaceId, User, UserId, UserPatch};

use super::memory_store::MemoryStore;

/// Process-local user storage with a unique email index.
pub struct MemoryUserRepository {
    store: Arc<MemoryStore>,
    clock: Arc<dyn Clock>,
}

impl MemoryUserRepository {
    /// Users kept in `store`, stamped by `clock`.
    pub fn new(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn add(&self, user: &User) -> Result<(), PersistenceError> {
        self.store.users.insert(user)
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        self.store.users.get(id)
    }

    async fn get_all(&self) -> Result<Vec<User>, PersistenceError> {
        self.store.users.all()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        self.store.users.find(|user| user.email().as_str() == email)
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, PersistenceError> {
        let now = self.clock.utc();
        self.store.users.replace_with(id, |user| {
            patched(user, patch, now).map_err(PersistenceError::validation)
        })
    }

    /// Removes the user's places, the reviews of those places and every
    /// review the user wrote.
    async fn delete(&self, id: &UserId) -> Result<(), PersistenceError> {
        let mut users = self.store.users.lock()?;
        let mut places = self.store.places.lock()?;
        let mut reviews = self.store.reviews.lock()?;
        users.remove(id)?;
        let owned: Vec<PlaceId> = places
            .iter()
            .filter(|place| place.owner_id() == id)
            .map(|place| place.id().clone())
            .collect();
        reviews.remove_where(|review| review.user_id() == id || owned.contains(review.place_id()));
        places.remove_where(|place| place.owner_id() == id);
        Ok(())
    }
}
