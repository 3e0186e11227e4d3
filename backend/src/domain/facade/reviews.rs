//! Reviews: one per guest per place, never by the owner.

use serde_json::json;
use tracing::{debug, info};

use super::{RentalFacade, persistence_failure};
use crate::domain::{
    Actor, Error, Patch, PlaceId, Review, ReviewId, ReviewPatch, UserId, ensure_owner_or_admin,
};

/// Review input. The author is always the acting user.
#[derive(Debug, Clone)]
pub struct NewReview {
    /// Required.
    pub text: String,
    /// Whole stars from 1 to 5.
    pub rating: i64,
    /// The reviewed listing.
    pub place_id: PlaceId,
}

/// Caller-supplied review changes.
///
/// `place_id` and `user_id` may echo the stored values; anything else is
/// rejected because reviews cannot move between places or authors.
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    /// New text.
    pub text: Option<String>,
    /// New rating.
    pub rating: Option<i64>,
    /// Must match the stored place.
    pub place_id: Option<PlaceId>,
    /// Must match the stored author.
    pub user_id: Option<UserId>,
}

impl RentalFacade {
    /// Review a place as the acting user.
    pub async fn create_review(&self, actor: &Actor, new: NewReview) -> Result<Review, Error> {
        let place = self.get_place(&new.place_id).await?;
        if actor.is(place.owner_id()) {
            debug!(place_id = %place.id(), "owner attempted to review own place");
            return Err(Error::invalid_request("cannot review own place"));
        }
        let author = self.users.get(actor.id()).await.map_err(persistence_failure)?;
        if author.is_none() {
            return Err(unknown_reference("User not found", "user_id"));
        }
        if self.get_review_by_user_and_place(actor.id(), place.id()).await?.is_some() {
            return Err(Error::conflict("user has already reviewed this place"));
        }

        let review = Review::new(
            new.text,
            new.rating,
            place.id().clone(),
            actor.id().clone(),
            self.now(),
        )?;
        self.reviews.add(&review).await.map_err(persistence_failure)?;
        info!(review_id = %review.id(), place_id = %place.id(), "review created");
        Ok(review)
    }

    /// Update a review as its author or an administrator.
    pub async fn update_review(
        &self,
        actor: &Actor,
        review_id: &ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, Error> {
        let current = self.get_review(review_id).await?;
        ensure_owner_or_admin(actor, current.user_id(), "update review")?;
        self.check_review_parents(&current, &update).await?;

        let patch = ReviewPatch {
            text: update.text,
            rating: update.rating,
        };
        if patch.is_empty() {
            return Ok(current);
        }
        let review = self
            .reviews
            .update(review_id, &patch)
            .await
            .map_err(persistence_failure)?;
        info!(review_id = %review_id, actor = %actor.id(), "review updated");
        Ok(review)
    }

    /// Delete a review as its author or an administrator.
    pub async fn delete_review(&self, actor: &Actor, review_id: &ReviewId) -> Result<(), Error> {
        let review = self.get_review(review_id).await?;
        ensure_owner_or_admin(actor, review.user_id(), "delete review")?;
        self.reviews
            .delete(review_id)
            .await
            .map_err(persistence_failure)?;
        info!(review_id = %review_id, actor = %actor.id(), "review deleted");
        Ok(())
    }

    /// Fetch one review.
    pub async fn get_review(&self, review_id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .get(review_id)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| Error::not_found(format!("review {review_id} not found")))
    }

    /// Every review in creation order.
    pub async fn list_reviews(&self) -> Result<Vec<Review>, Error> {
        self.reviews.get_all().await.map_err(persistence_failure)
    }

    /// Reviews of a place in creation order.
    pub async fn get_reviews_by_place(&self, place_id: &PlaceId) -> Result<Vec<Review>, Error> {
        self.get_place(place_id).await?;
        self.reviews
            .list_by_place(place_id)
            .await
            .map_err(persistence_failure)
    }

    /// Reviews written by `user_id`.
    pub async fn list_reviews_by_user(&self, user_id: &UserId) -> Result<Vec<Review>, Error> {
        self.get_user(user_id).await?;
        self.reviews
            .list_by_user(user_id)
            .await
            .map_err(persistence_failure)
    }

    /// The review `user_id` wrote for `place_id`, if any.
    pub async fn get_review_by_user_and_place(
        &self,
        user_id: &UserId,
        place_id: &PlaceId,
    ) -> Result<Option<Review>, Error> {
        self.reviews
            .find_by_user_and_place(user_id, place_id)
            .await
            .map_err(persistence_failure)
    }

    async fn check_review_parents(
        &self,
        current: &Review,
        update: &ReviewUpdate,
    ) -> Result<(), Error> {
        if let Some(place_id) = update
            .place_id
            .as_ref()
            .filter(|id| *id != current.place_id())
        {
            let exists = self
                .places
                .get(place_id)
                .await
                .map_err(persistence_failure)?
                .is_some();
            if !exists {
                return Err(unknown_reference("Place not found", "place_id"));
            }
            return Err(immutable_reference("place_id"));
        }
        if let Some(user_id) = update
            .user_id
            .as_ref()
            .filter(|id| *id != current.user_id())
        {
            let exists = self
                .users
                .get(user_id)
                .await
                .map_err(persistence_failure)?
                .is_some();
            if !exists {
                return Err(unknown_reference("User not found", "user_id"));
            }
            return Err(immutable_reference("user_id"));
        }
        Ok(())
    }
}

fn unknown_reference(message: &str, field: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": "unknown_reference",
    }))
}

fn immutable_reference(field: &str) -> Error {
    Error::invalid_request(format!("{field} cannot be changed")).with_details(json!({
        "field": field,
        "code": "immutable",
    }))
}
