//! Rental facade: the application service behind every listing use case.
//!
//! Each operation resolves references, authorizes the actor, validates and
//! constructs, persists, then returns the stored entity. The facade keeps no
//! state of its own beyond the collaborators it was built with.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{
    AmenityRepository, PasswordHashError, PasswordHasher, PersistenceError, PlaceRepository,
    ReviewRepository, UserRepository,
};

mod amenities;
mod places;
mod reviews;
mod users;

pub use amenities::{AmenityUpdate, NewAmenity};
pub use places::{NewPlace, PLACE_AMENITY, PlaceDetails, PlaceUpdate};
pub use reviews::{NewReview, ReviewUpdate};
pub use users::{NewUser, UserUpdate};

/// Parameter object bundling the facade's collaborators.
#[derive(Clone)]
pub struct FacadePorts {
    /// Account storage.
    pub users: Arc<dyn UserRepository>,
    /// Amenity catalogue.
    pub amenities: Arc<dyn AmenityRepository>,
    /// Listings and their amenity links.
    pub places: Arc<dyn PlaceRepository>,
    /// Reviews, one per author and place.
    pub reviews: Arc<dyn ReviewRepository>,
    /// Digests passwords on registration and verifies them on login.
    pub passwords: Arc<dyn PasswordHasher>,
    /// Source of `created_at` and `updated_at`.
    pub clock: Arc<dyn Clock>,
}

/// Application service coordinating users, amenities, places and reviews.
#[derive(Clone)]
pub struct RentalFacade {
    users: Arc<dyn UserRepository>,
    amenities: Arc<dyn AmenityRepository>,
    places: Arc<dyn PlaceRepository>,
    reviews: Arc<dyn ReviewRepository>,
    passwords: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl RentalFacade {
    /// Assemble the facade from its ports.
    pub fn new(ports: FacadePorts) -> Self {
        let FacadePorts {
            users,
            amenities,
            places,
            reviews,
            passwords,
            clock,
        } = ports;
        Self {
            users,
            amenities,
            places,
            reviews,
            passwords,
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

/// Translate adapter failures into the domain taxonomy.
fn persistence_failure(err: PersistenceError) -> Error {
    match err {
        PersistenceError::NotFound { .. } => Error::not_found(err.to_string()),
        PersistenceError::Duplicate { .. } => Error::conflict(err.to_string()),
        PersistenceError::MissingReference { field } => {
            Error::invalid_request(format!("referenced {field} not found")).with_details(json!({
                "field": field,
                "code": "unknown_reference",
            }))
        }
        PersistenceError::Validation { reason } => reason.into(),
        PersistenceError::Query { message } => {
            error!(%message, "repository query failed");
            Error::internal("persistence failure")
        }
    }
}

fn hash_failure(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal("password hashing failed")
}
