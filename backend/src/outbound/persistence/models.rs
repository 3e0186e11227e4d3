//! Diesel row structs and their conversions to domain entities.
//!
//! Rows never leave the persistence layer. Reads rebuild entities through
//! their `restore` constructors, so a row that no longer satisfies the
//! domain rules surfaces as a query error instead of a half-valid entity.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    Amenity, AmenityId, PasswordDigest, Place, PlaceDraft, PlaceId, Review, ReviewId, Timestamps,
    User, UserId, ValidationError,
};

use super::schema::{amenities, place_amenities, places, reviews, users};

fn corrupt_row(kind: &'static str, id: Uuid, err: &ValidationError) -> PersistenceError {
    warn!(%kind, %id, error = %err, "stored row failed validation");
    PersistenceError::query(format!("stored {kind} {id} is invalid"))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, PersistenceError> {
        let id = self.id;
        User::restore(
            UserId::from_uuid(id),
            self.first_name,
            self.last_name,
            self.email,
            PasswordDigest::from_encoded(self.password_hash),
            self.is_admin,
            Timestamps::restore(self.created_at, self.updated_at),
        )
        .map_err(|err| corrupt_row("user", id, &err))
    }
}

/// Insertable and update form of a user; every stored column is written.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for UserRecord<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            email: user.email().as_str(),
            password_hash: user.password_digest().encoded(),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = amenities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AmenityRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AmenityRow {
    pub(crate) fn into_domain(self) -> Result<Amenity, PersistenceError> {
        let id = self.id;
        Amenity::restore(
            AmenityId::from_uuid(id),
            self.name,
            Timestamps::restore(self.created_at, self.updated_at),
        )
        .map_err(|err| corrupt_row("amenity", id, &err))
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = amenities)]
pub(crate) struct AmenityRecord<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Amenity> for AmenityRecord<'a> {
    fn from(amenity: &'a Amenity) -> Self {
        Self {
            id: *amenity.id().as_uuid(),
            name: amenity.name(),
            created_at: amenity.created_at(),
            updated_at: amenity.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaceRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaceRow {
    /// Rebuild the place with the amenity ids linked to it.
    pub(crate) fn into_domain(
        self,
        amenity_ids: BTreeSet<AmenityId>,
    ) -> Result<Place, PersistenceError> {
        let id = self.id;
        let draft = PlaceDraft {
            title: self.title,
            description: self.description,
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
        };
        Place::restore(
            PlaceId::from_uuid(id),
            draft,
            UserId::from_uuid(self.owner_id),
            amenity_ids,
            Timestamps::restore(self.created_at, self.updated_at),
        )
        .map_err(|err| corrupt_row("place", id, &err))
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = places)]
pub(crate) struct PlaceRecord<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Place> for PlaceRecord<'a> {
    fn from(place: &'a Place) -> Self {
        Self {
            id: *place.id().as_uuid(),
            title: place.title(),
            description: place.description(),
            price: place.price(),
            latitude: place.latitude(),
            longitude: place.longitude(),
            owner_id: *place.owner_id().as_uuid(),
            created_at: place.created_at(),
            updated_at: place.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = place_amenities)]
pub(crate) struct PlaceAmenityRecord {
    pub place_id: Uuid,
    pub amenity_id: Uuid,
}

/// Join rows linking `place` to each of its amenities.
pub(crate) fn amenity_links(place: &Place) -> Vec<PlaceAmenityRecord> {
    place
        .amenity_ids()
        .iter()
        .map(|amenity_id| PlaceAmenityRecord {
            place_id: *place.id().as_uuid(),
            amenity_id: *amenity_id.as_uuid(),
        })
        .collect()
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub text: String,
    pub rating: i16,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewRow {
    pub(crate) fn into_domain(self) -> Result<Review, PersistenceError> {
        let id = self.id;
        Review::restore(
            ReviewId::from_uuid(id),
            self.text,
            i64::from(self.rating),
            PlaceId::from_uuid(self.place_id),
            UserId::from_uuid(self.user_id),
            Timestamps::restore(self.created_at, self.updated_at),
        )
        .map_err(|err| corrupt_row("review", id, &err))
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewRecord<'a> {
    pub id: Uuid,
    pub text: &'a str,
    pub rating: i16,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Review> for ReviewRecord<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            id: *review.id().as_uuid(),
            text: review.text(),
            rating: i16::from(review.rating()),
            place_id: *review.place_id().as_uuid(),
            user_id: *review.user_id().as_uuid(),
            created_at: review.created_at(),
            updated_at: review.updated_at(),
        }
    }
}

/// Collect rows into entities, failing on the first invalid row.
pub(crate) fn into_domain_all<R, E>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<E, PersistenceError>,
) -> Result<Vec<E>, PersistenceError> {
    rows.into_iter().map(convert).collect()
}
