//! Rental listings.
//!
//! A place records its owner and the set of amenities it offers. Reviews are
//! not held here; they are queried through the review repository.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::entity::{Entity, Patch};
use super::validation::{
    ValidationError, validate_finite, validate_number_range, validate_positive,
    validate_string_length,
};
use super::{AmenityId, PlaceId, Timestamps, UserId};

/// Maximum title length.
pub const TITLE_MAX: usize = 100;
/// Inclusive latitude bounds in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Inclusive longitude bounds in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Caller-controlled fields of a new place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDraft {
    /// Listing headline.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Nightly price.
    pub price: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A listing owned by one user.
///
/// ## Invariants
/// - `title` is 1..=100 characters and not blank.
/// - `price` is finite and greater than zero.
/// - `latitude` lies in [-90, 90] and `longitude` in [-180, 180].
/// - `owner_id` is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: PlaceId,
    title: String,
    description: String,
    price: f64,
    latitude: f64,
    longitude: f64,
    owner_id: UserId,
    amenity_ids: BTreeSet<AmenityId>,
    timestamps: Timestamps,
}

impl Place {
    /// Build a place owned by `owner_id`, validating every field.
    pub fn new(
        draft: PlaceDraft,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let PlaceDraft {
            title,
            description,
            price,
            latitude,
            longitude,
        } = draft;
        validate_title(&title)?;
        validate_positive(price, "price")?;
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            id: PlaceId::random(),
            title,
            description,
            price,
            latitude,
            longitude,
            owner_id,
            amenity_ids: BTreeSet::new(),
            timestamps: Timestamps::new(now),
        })
    }

    /// Rebuild a stored place, re-checking every field rule.
    pub fn restore(
        id: PlaceId,
        draft: PlaceDraft,
        owner_id: UserId,
        amenity_ids: BTreeSet<AmenityId>,
        timestamps: Timestamps,
    ) -> Result<Self, ValidationError> {
        let mut place = Self::new(draft, owner_id, timestamps.created_at())?;
        place.id = id;
        place.amenity_ids = amenity_ids;
        place.timestamps = timestamps;
        Ok(place)
    }

    /// Stable identifier.
    pub fn id(&self) -> &PlaceId {
        &self.id
    }

    /// Listing headline.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-form description; empty when none was given.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Nightly price, always positive.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// User who owns the listing.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Amenities currently associated with the place, in id order.
    pub fn amenity_ids(&self) -> &BTreeSet<AmenityId> {
        &self.amenity_ids
    }

    /// Whether `amenity_id` is associated with the place.
    pub fn has_amenity(&self, amenity_id: &AmenityId) -> bool {
        self.amenity_ids.contains(amenity_id)
    }

    /// Creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    /// Latest modification instant.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// Replace the title, validating length.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        Ok(())
    }

    /// Replace the free-text description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the price. Non-finite or non-positive values are rejected.
    pub fn set_price(&mut self, price: f64) -> Result<(), ValidationError> {
        validate_positive(price, "price")?;
        self.price = price;
        Ok(())
    }

    /// Move the listing north or south.
    pub fn set_latitude(&mut self, latitude: f64) -> Result<(), ValidationError> {
        validate_latitude(latitude)?;
        self.latitude = latitude;
        Ok(())
    }

    /// Move the listing east or west.
    pub fn set_longitude(&mut self, longitude: f64) -> Result<(), ValidationError> {
        validate_longitude(longitude)?;
        self.longitude = longitude;
        Ok(())
    }

    /// Add an amenity. Returns `false` when it was already associated.
    pub fn attach_amenity(&mut self, amenity_id: AmenityId) -> bool {
        self.amenity_ids.insert(amenity_id)
    }

    /// Remove an amenity. Returns `false` when it was not associated.
    pub fn detach_amenity(&mut self, amenity_id: &AmenityId) -> bool {
        self.amenity_ids.remove(amenity_id)
    }

    /// Replace the whole association set.
    pub fn replace_amenities(&mut self, amenity_ids: BTreeSet<AmenityId>) {
        self.amenity_ids = amenity_ids;
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    validate_string_length(title, "title", TITLE_MAX, true)
}

fn validate_latitude(latitude: f64) -> Result<(), ValidationError> {
    validate_finite(latitude, "latitude")?;
    validate_number_range(
        latitude,
        "latitude",
        Some(LATITUDE_RANGE.0),
        Some(LATITUDE_RANGE.1),
    )
}

fn validate_longitude(longitude: f64) -> Result<(), ValidationError> {
    validate_finite(longitude, "longitude")?;
    validate_number_range(
        longitude,
        "longitude",
        Some(LONGITUDE_RANGE.0),
        Some(LONGITUDE_RANGE.1),
    )
}

impl Entity for Place {
    type Id = PlaceId;
    const KIND: &'static str = "place";

    fn entity_id(&self) -> &PlaceId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamps.touch(now);
    }
}

/// Stored-field changes for a place.
///
/// `amenities`, when present, replaces the association set wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacePatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement price.
    pub price: Option<f64>,
    /// Replacement latitude.
    pub latitude: Option<f64>,
    /// Replacement longitude.
    pub longitude: Option<f64>,
    /// Replacement amenity set.
    pub amenities: Option<BTreeSet<AmenityId>>,
}

impl Patch<Place> for PlacePatch {
    fn apply_to(&self, place: &mut Place) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            place.set_title(title.as_str())?;
        }
        if let Some(description) = &self.description {
            place.set_description(description.as_str());
        }
        if let Some(price) = self.price {
            place.set_price(price)?;
        }
        if let Some(latitude) = self.latitude {
            place.set_latitude(latitude)?;
        }
        if let Some(longitude) = self.longitude {
            place.set_longitude(longitude)?;
        }
        if let Some(amenities) = &self.amenities {
            place.replace_amenities(amenities.clone());
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.amenities.is_none()
    }
}
