//! Port abstraction for persisting places and their amenity associations.

use async_trait::async_trait;

use crate::domain::{AmenityId, Place, PlaceId, PlacePatch, UserId};

use super::PersistenceError;

/// Storage for [`Place`] rows including the place-amenity join.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Fails with `MissingReference` when the owner or a linked amenity does
    /// not exist.
    async fn add(&self, place: &Place) -> Result<(), PersistenceError>;

    /// Look up one place with its amenity links.
    async fn get(&self, id: &PlaceId) -> Result<Option<Place>, PersistenceError>;

    /// All places in creation order.
    async fn get_all(&self) -> Result<Vec<Place>, PersistenceError>;

    /// Places owned by one user.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Place>, PersistenceError>;

    /// Apply `patch` atomically. A replacement amenity set naming a missing
    /// amenity fails with `MissingReference` and writes nothing.
    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<Place, PersistenceError>;

    /// Associate an amenity. Fails with `Duplicate` when already associated
    /// and `MissingReference` when the amenity does not exist.
    async fn attach_amenity(
        &self,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, PersistenceError>;

    /// Dissociate an amenity. Fails with `NotFound` when not associated.
    async fn detach_amenity(
        &self,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, PersistenceError>;

    /// Remove a place together with its reviews and amenity links in one
    /// atomic step, returning how many reviews went with it.
    async fn delete(&self, id: &PlaceId) -> Result<usize, PersistenceError>;
}
