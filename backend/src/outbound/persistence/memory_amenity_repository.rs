//! In-memory `AmenityRepository` adapter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::ports::{AmenityRepository, PersistenceError};
use crate::domain::{Amenity, AmenityId, AmenityPatch};

use super::memory_store::MemoryStore;

/// Process-local amenity catalogue with unique names.
pub struct MemoryAmenityRepository {
    store: Arc<MemoryStore>,
    clock: Arc<dyn Clock>,
}

impl MemoryAmenityRepository {
    /// Amenities kept in `store`, stamped by `clock`.
    pub fn new(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl AmenityRepository for MemoryAmenityRepository {
    async fn add(&self, amenity: &Amenity) -> Result<(), PersistenceError> {
        self.store.amenities.insert(amenity)
    }

    async fn get(&self, id: &AmenityId) -> Result<Option<Amenity>, PersistenceError> {
        self.store.amenities.get(id)
    }

    async fn get_all(&self) -> Result<Vec<Amenity>, PersistenceError> {
        self.store.amenities.all()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Amenity>, PersistenceError> {
        self.store.amenities.find(|amenity| amenity.name() == name)
    }

    async fn update(
        &self,
        id: &AmenityId,
        patch: &AmenityPatch,
    ) -> Result<Amenity, PersistenceError> {
        let now = self.clock.utc();
        self.store.amenities.replace_with(id, |amenity| {
            patched(amenity, patch, now).map_err(PersistenceError::validation)
        })
    }

    /// Unlinks the amenity from every place before dropping it.
    async fn delete(&self, id: &AmenityId) -> Result<(), PersistenceError> {
        let mut amenities = self.store.amenities.lock()?;
        let mut places = self.store.places.lock()?;
        amenities.remove(id)?;
        places.for_each_mut(|place| {
            place.detach_amenity(id);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Place, PlaceDraft, UserId};
    use mockable::DefaultClock;

    #[tokio::test]
    async fn rename_to_taken_name_is_rejected() {
        let repo = MemoryAmenityRepository::new(Arc::new(MemoryStore::new()), Arc::new(DefaultClock));
        let wifi = Amenity::new("Wi-Fi", DefaultClock.utc()).expect("valid");
        let pool = Amenity::new("Pool", DefaultClock.utc()).expect("valid");
        repo.add(&wifi).await.expect("insert wifi");
        repo.add(&pool).await.expect("insert pool");

        let patch = AmenityPatch {
            name: Some("Wi-Fi".to_owned()),
        };
        let err = repo.update(pool.id(), &patch).await.expect_err("name taken");

        assert_eq!(err, PersistenceError::duplicate("amenities.name"));
    }

    #[tokio::test]
    async fn delete_reports_unknown_ids() {
        let repo = MemoryAmenityRepository::new(Arc::new(MemoryStore::new()), Arc::new(DefaultClock));
        let err = repo
            .delete(&AmenityId::random())
            .await
            .expect_err("nothing to delete");
        assert!(matches!(err, PersistenceError::NotFound { ref entity, .. } if entity == "amenity"));
    }

    #[tokio::test]
    async fn delete_unlinks_the_amenity_from_places() {
        let store = Arc::new(MemoryStore::new());
        let repo = MemoryAmenityRepository::new(store.clone(), Arc::new(DefaultClock));
        let sauna = Amenity::new("Sauna", DefaultClock.utc()).expect("valid");
        repo.add(&sauna).await.expect("insert sauna");
        let draft = PlaceDraft {
            title: "Chalet".to_owned(),
            description: String::new(),
            price: 150.0,
            latitude: 45.9,
            longitude: 6.8,
        };
        let mut chalet = Place::new(draft, UserId::random(), DefaultClock.utc()).expect("place");
        chalet.attach_amenity(sauna.id().clone());
        store.places.insert(&chalet).expect("insert place");

        repo.delete(sauna.id()).await.expect("delete sauna");

        let stored = store.places.get(chalet.id()).expect("read").expect("place kept");
        assert!(stored.amenity_ids().is_empty());
    }
}
