//! Port abstraction for persisting amenities.

use async_trait::async_trait;

use crate::domain::{Amenity, AmenityId, AmenityPatch};

use super::PersistenceError;

/// Storage for [`Amenity`] rows. Names are unique across all rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AmenityRepository: Send + Sync {
    /// Insert a new amenity. Fails with `Duplicate` when the name is taken.
    async fn add(&self, amenity: &Amenity) -> Result<(), PersistenceError>;

    /// Look up one amenity.
    async fn get(&self, id: &AmenityId) -> Result<Option<Amenity>, PersistenceError>;

    /// The catalogue in creation order.
    async fn get_all(&self) -> Result<Vec<Amenity>, PersistenceError>;

    /// Exact name match.
    async fn find_by_name(&self, name: &str) -> Result<Option<Amenity>, PersistenceError>;

    /// Rename an amenity; names stay unique.
    async fn update(
        &self,
        id: &AmenityId,
        patch: &AmenityPatch,
    ) -> Result<Amenity, PersistenceError>;

    /// Remove an amenity and unlink it from every place.
    async fn delete(&self, id: &AmenityId) -> Result<(), PersistenceError>;
}
