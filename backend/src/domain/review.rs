//! Guest reviews of places.

use chrono::{DateTime, Utc};

use super::entity::{Entity, Patch};
use super::validation::{ValidationError, validate_number_range, validate_required};
use super::{PlaceId, ReviewId, Timestamps, UserId};

/// Lowest accepted rating.
pub const RATING_MIN: i64 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i64 = 5;

/// Review left by one user for one place.
///
/// ## Invariants
/// - `text` is not blank.
/// - `rating` is an integer in 1..=5.
/// - `place_id` and `user_id` are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    text: String,
    rating: u8,
    place_id: PlaceId,
    user_id: UserId,
    timestamps: Timestamps,
}

impl Review {
    /// Build a review of `place_id` by `user_id`, validating text and rating.
    pub fn new(
        text: impl Into<String>,
        rating: i64,
        place_id: PlaceId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        validate_required(&text, "text")?;
        Ok(Self {
            id: ReviewId::random(),
            text,
            rating: checked_rating(rating)?,
            place_id,
            user_id,
            timestamps: Timestamps::new(now),
        })
    }

    /// Rebuild a stored review, re-checking text and rating.
    pub fn restore(
        id: ReviewId,
        text: impl Into<String>,
        rating: i64,
        place_id: PlaceId,
        user_id: UserId,
        timestamps: Timestamps,
    ) -> Result<Self, ValidationError> {
        let mut review = Self::new(text, rating, place_id, user_id, timestamps.created_at())?;
        review.id = id;
        review.timestamps = timestamps;
        Ok(review)
    }

    /// Stable identifier.
    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    /// Review body.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Rating between [`RATING_MIN`] and [`RATING_MAX`].
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Reviewed place.
    pub fn place_id(&self) -> &PlaceId {
        &self.place_id
    }

    /// Author of the review.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    /// Latest modification instant.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// Replace the text; blank text is rejected.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ValidationError> {
        let text = text.into();
        validate_required(&text, "text")?;
        self.text = text;
        Ok(())
    }

    /// Replace the rating, enforcing the accepted range.
    pub fn set_rating(&mut self, rating: i64) -> Result<(), ValidationError> {
        self.rating = checked_rating(rating)?;
        Ok(())
    }
}

fn checked_rating(rating: i64) -> Result<u8, ValidationError> {
    validate_number_range(rating, "rating", Some(RATING_MIN), Some(RATING_MAX))?;
    u8::try_from(rating).map_err(|_| ValidationError::AboveMaximum {
        field: "rating",
        max: RATING_MAX.to_string(),
    })
}

impl Entity for Review {
    type Id = ReviewId;
    const KIND: &'static str = "review";

    fn entity_id(&self) -> &ReviewId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamps.touch(now);
    }
}

/// Stored-field changes for a review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    /// Replacement text.
    pub text: Option<String>,
    /// Replacement rating.
    pub rating: Option<i64>,
}

impl Patch<Review> for ReviewPatch {
    fn apply_to(&self, review: &mut Review) -> Result<(), ValidationError> {
        if let Some(text) = &self.text {
            review.set_text(text.as_str())?;
        }
        if let Some(rating) = self.rating {
            review.set_rating(rating)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.text.is_none() && self.rating.is_none()
    }
}
