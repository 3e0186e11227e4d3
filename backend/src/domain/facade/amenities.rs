//! Amenity catalogue maintenance. Writes are reserved for administrators.

use tracing::{debug, info};

use super::{RentalFacade, persistence_failure};
use crate::domain::{Actor, Amenity, AmenityId, AmenityPatch, Error, Patch, ensure_admin};

/// Amenity creation input.
#[derive(Debug, Clone)]
pub struct NewAmenity {
    /// Unique, at most 50 characters.
    pub name: String,
}

/// Amenity rename.
#[derive(Debug, Clone, Default)]
pub struct AmenityUpdate {
    /// Replacement name, still unique.
    pub name: Option<String>,
}

impl RentalFacade {
    /// Add an amenity to the catalogue.
    pub async fn create_amenity(&self, actor: &Actor, new: NewAmenity) -> Result<Amenity, Error> {
        ensure_admin(actor, "create amenities")?;
        self.ensure_amenity_name_available(&new.name).await?;

        let amenity = Amenity::new(new.name, self.now())?;
        self.amenities
            .add(&amenity)
            .await
            .map_err(persistence_failure)?;
        info!(amenity_id = %amenity.id(), "amenity created");
        Ok(amenity)
    }

    /// Rename an amenity. Uniqueness is re-checked only when the name changes.
    pub async fn update_amenity(
        &self,
        actor: &Actor,
        amenity_id: &AmenityId,
        update: AmenityUpdate,
    ) -> Result<Amenity, Error> {
        let current = self.get_amenity(amenity_id).await?;
        ensure_admin(actor, "update amenities")?;

        if let Some(name) = update.name.as_deref().filter(|name| *name != current.name()) {
            self.ensure_amenity_name_available(name).await?;
        }

        let patch = AmenityPatch { name: update.name };
        if patch.is_empty() {
            return Ok(current);
        }
        let amenity = self
            .amenities
            .update(amenity_id, &patch)
            .await
            .map_err(persistence_failure)?;
        info!(amenity_id = %amenity.id(), "amenity updated");
        Ok(amenity)
    }

    /// Fetch one amenity.
    pub async fn get_amenity(&self, amenity_id: &AmenityId) -> Result<Amenity, Error> {
        self.amenities
            .get(amenity_id)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| Error::not_found(format!("amenity {amenity_id} not found")))
    }

    /// The whole catalogue.
    pub async fn list_amenities(&self) -> Result<Vec<Amenity>, Error> {
        self.amenities.get_all().await.map_err(persistence_failure)
    }

    async fn ensure_amenity_name_available(&self, name: &str) -> Result<(), Error> {
        let existing = self
            .amenities
            .find_by_name(name)
            .await
            .map_err(persistence_failure)?;
        if let Some(amenity) = existing {
            debug!(amenity_id = %amenity.id(), "amenity name taken");
            return Err(Error::conflict("amenity already exists"));
        }
        Ok(())
    }
}
