//! Listing lifecycle and the place-amenity association.

use std::collections::BTreeSet;

use serde_json::json;
use tracing::{debug, error, info};

use super::{RentalFacade, persistence_failure};
use crate::domain::ports::PersistenceError;
use crate::domain::{
    Actor, Amenity, AmenityId, Error, Patch, Place, PlaceDraft, PlaceId, PlacePatch, User, UserId,
    ensure_owner_or_admin,
};

/// Entity name used by repositories for the place-amenity join.
pub const PLACE_AMENITY: &str = "place_amenity";

/// Listing input. `owner_id` defaults to the acting user.
#[derive(Debug, Clone)]
pub struct NewPlace {
    /// Required, at most 100 characters.
    pub title: String,
    /// Stored as empty when omitted.
    pub description: Option<String>,
    /// Nightly price, strictly positive.
    pub price: f64,
    /// Degrees in `-90.0..=90.0`.
    pub latitude: f64,
    /// Degrees in `-180.0..=180.0`.
    pub longitude: f64,
    /// Listing owner; another user's id needs an administrator.
    pub owner_id: Option<UserId>,
    /// Amenities to link; each must exist.
    pub amenities: Vec<AmenityId>,
}

/// Caller-supplied listing changes.
///
/// `owner_id` is accepted for payload compatibility and ignored: ownership
/// never changes after creation. `amenities` replaces the association set.
#[derive(Debug, Clone, Default)]
pub struct PlaceUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New nightly price.
    pub price: Option<f64>,
    /// New latitude.
    pub latitude: Option<f64>,
    /// New longitude.
    pub longitude: Option<f64>,
    /// Ignored.
    pub owner_id: Option<UserId>,
    /// Replacement amenity set.
    pub amenities: Option<Vec<AmenityId>>,
}

/// A place with its owner and amenities resolved.
#[derive(Debug, Clone)]
pub struct PlaceDetails {
    /// The listing.
    pub place: Place,
    /// Its owner.
    pub owner: User,
    /// Linked amenities in id order.
    pub amenities: Vec<Amenity>,
}

impl RentalFacade {
    /// Create a listing owned by the actor.
    ///
    /// Administrators may list on behalf of another user through `owner_id`.
    /// Unknown owners and amenities are `InvalidRequest` whoever the actor
    /// is; the on-behalf-of check only applies to owners that exist.
    pub async fn create_place(&self, actor: &Actor, new: NewPlace) -> Result<Place, Error> {
        let owner_id = new.owner_id.unwrap_or_else(|| actor.id().clone());
        self.resolve_owner(&owner_id).await?;
        if !actor.is(&owner_id) && !actor.is_admin() {
            debug!(actor = %actor.id(), owner = %owner_id, "listing for another user rejected");
            return Err(Error::forbidden("cannot create a place for another user"));
        }
        let amenity_ids = self.resolve_amenities(&new.amenities).await?;

        let draft = PlaceDraft {
            title: new.title,
            description: new.description.unwrap_or_default(),
            price: new.price,
            latitude: new.latitude,
            longitude: new.longitude,
        };
        let mut place = Place::new(draft, owner_id, self.now())?;
        place.replace_amenities(amenity_ids);

        self.places.add(&place).await.map_err(persistence_failure)?;
        info!(place_id = %place.id(), owner = %place.owner_id(), "place created");
        Ok(place)
    }

    /// Update a listing as its owner or an administrator.
    pub async fn update_place(
        &self,
        actor: &Actor,
        place_id: &PlaceId,
        update: PlaceUpdate,
    ) -> Result<Place, Error> {
        let current = self.get_place(place_id).await?;
        ensure_owner_or_admin(actor, current.owner_id(), "update place")?;

        if update
            .owner_id
            .as_ref()
            .is_some_and(|owner| owner != current.owner_id())
        {
            debug!(place_id = %place_id, "ignoring owner change in place update");
        }

        let amenities = match &update.amenities {
            Some(ids) => Some(self.resolve_amenities(ids).await?),
            None => None,
        };
        let patch = PlacePatch {
            title: update.title,
            description: update.description,
            price: update.price,
            latitude: update.latitude,
            longitude: update.longitude,
            amenities,
        };
        if patch.is_empty() {
            return Ok(current);
        }

        let place = self
            .places
            .update(place_id, &patch)
            .await
            .map_err(persistence_failure)?;
        info!(place_id = %place.id(), actor = %actor.id(), "place updated");
        Ok(place)
    }

    /// Delete a listing and, with it, every review of it. Amenities stay.
    pub async fn delete_place(&self, actor: &Actor, place_id: &PlaceId) -> Result<(), Error> {
        let place = self.get_place(place_id).await?;
        ensure_owner_or_admin(actor, place.owner_id(), "delete place")?;

        let removed = self
            .places
            .delete(place_id)
            .await
            .map_err(persistence_failure)?;
        info!(place_id = %place_id, reviews_removed = removed, "place deleted");
        Ok(())
    }

    /// Associate an amenity with a place. Duplicate links are `Conflict`.
    pub async fn add_amenity_to_place(
        &self,
        actor: &Actor,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, Error> {
        let place = self.get_place(place_id).await?;
        self.get_amenity(amenity_id).await?;
        ensure_owner_or_admin(actor, place.owner_id(), "update place amenities")?;

        if place.has_amenity(amenity_id) {
            return Err(Error::conflict("amenity already linked to place"));
        }
        let place = self
            .places
            .attach_amenity(place_id, amenity_id)
            .await
            .map_err(persistence_failure)?;
        info!(place_id = %place_id, amenity_id = %amenity_id, "amenity attached");
        Ok(place)
    }

    /// Remove an amenity from a place. Missing links are `Conflict`.
    pub async fn remove_amenity_from_place(
        &self,
        actor: &Actor,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, Error> {
        let place = self.get_place(place_id).await?;
        self.get_amenity(amenity_id).await?;
        ensure_owner_or_admin(actor, place.owner_id(), "update place amenities")?;

        if !place.has_amenity(amenity_id) {
            return Err(Error::conflict("amenity is not linked to place"));
        }
        let place = self
            .places
            .detach_amenity(place_id, amenity_id)
            .await
            .map_err(|err| match err {
                // Another request removed the link between the check and the write.
                PersistenceError::NotFound { entity, .. } if entity == PLACE_AMENITY => {
                    Error::conflict("amenity is not linked to place")
                }
                other => persistence_failure(other),
            })?;
        info!(place_id = %place_id, amenity_id = %amenity_id, "amenity detached");
        Ok(place)
    }

    /// Fetch one listing.
    pub async fn get_place(&self, place_id: &PlaceId) -> Result<Place, Error> {
        self.places
            .get(place_id)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| Error::not_found(format!("place {place_id} not found")))
    }

    /// Fetch a place together with its owner and amenities.
    pub async fn get_place_details(&self, place_id: &PlaceId) -> Result<PlaceDetails, Error> {
        let place = self.get_place(place_id).await?;
        let owner = self.get_user(place.owner_id()).await.map_err(|err| {
            error!(place_id = %place_id, error = %err, "place owner missing");
            Error::internal("place owner missing")
        })?;
        let mut amenities = Vec::with_capacity(place.amenity_ids().len());
        for amenity_id in place.amenity_ids() {
            amenities.push(self.get_amenity(amenity_id).await?);
        }
        Ok(PlaceDetails {
            place,
            owner,
            amenities,
        })
    }

    /// Every listing in creation order.
    pub async fn list_places(&self) -> Result<Vec<Place>, Error> {
        self.places.get_all().await.map_err(persistence_failure)
    }

    /// Listings owned by `owner_id`. Unknown owners are `NotFound`.
    pub async fn list_places_by_owner(&self, owner_id: &UserId) -> Result<Vec<Place>, Error> {
        self.get_user(owner_id).await?;
        self.places
            .list_by_owner(owner_id)
            .await
            .map_err(persistence_failure)
    }

    async fn resolve_owner(&self, owner_id: &UserId) -> Result<User, Error> {
        self.users
            .get(owner_id)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| {
                Error::invalid_request("Owner not found").with_details(json!({
                    "field": "owner_id",
                    "code": "unknown_reference",
                }))
            })
    }

    async fn resolve_amenities(&self, ids: &[AmenityId]) -> Result<BTreeSet<AmenityId>, Error> {
        let mut resolved = BTreeSet::new();
        for amenity_id in ids {
            let found = self
                .amenities
                .get(amenity_id)
                .await
                .map_err(persistence_failure)?;
            if found.is_none() {
                return Err(
                    Error::invalid_request(format!("Amenity {amenity_id} not found"))
                        .with_details(json!({
                            "field": "amenities",
                            "code": "unknown_reference",
                            "id": amenity_id.as_ref(),
                        })),
                );
            }
            resolved.insert(amenity_id.clone());
        }
        Ok(resolved)
    }
}
