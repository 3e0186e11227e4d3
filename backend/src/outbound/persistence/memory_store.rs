//! Tables shared by the in-memory repositories.
//!
//! Writes that touch more than one table lock them in declaration order
//! (users, amenities, places, reviews). Reference checks and cascades run
//! under those locks, so a review can never be inserted for a place that is
//! being deleted, and deleting a parent takes its dependants with it.

use crate::domain::ports::PersistenceError;
use crate::domain::{Amenity, Place, Review, User};

use super::memory_table::MemoryTable;

fn same_email(existing: &User, candidate: &User) -> Option<&'static str> {
    (existing.email() == candidate.email()).then_some("users.email")
}

fn same_amenity_name(existing: &Amenity, candidate: &Amenity) -> Option<&'static str> {
    (existing.name() == candidate.name()).then_some("amenities.name")
}

fn same_author_and_place(existing: &Review, candidate: &Review) -> Option<&'static str> {
    (existing.user_id() == candidate.user_id() && existing.place_id() == candidate.place_id())
        .then_some("reviews.user_place")
}

/// Process-local storage backing every `Memory*Repository`.
///
/// Build one store per facade and hand clones of the same `Arc` to each
/// repository; repositories built on different stores share nothing.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use hbnb_backend::outbound::persistence::{
///     MemoryPlaceRepository, MemoryReviewRepository, MemoryStore,
/// };
/// use mockable::DefaultClock;
///
/// let store = Arc::new(MemoryStore::new());
/// let clock = Arc::new(DefaultClock);
/// let places = MemoryPlaceRepository::new(store.clone(), clock.clone());
/// let reviews = MemoryReviewRepository::new(store, clock);
/// # let _ = (places, reviews);
/// ```
pub struct MemoryStore {
    pub(crate) users: MemoryTable<User>,
    pub(crate) amenities: MemoryTable<Amenity>,
    pub(crate) places: MemoryTable<Place>,
    pub(crate) reviews: MemoryTable<Review>,
}

impl MemoryStore {
    /// An empty store with every unique index in place.
    pub fn new() -> Self {
        Self {
            users: MemoryTable::new(same_email),
            amenities: MemoryTable::new(same_amenity_name),
            places: MemoryTable::new(super::memory_table::unconstrained),
            reviews: MemoryTable::new(same_author_and_place),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn missing(field: &str) -> PersistenceError {
    PersistenceError::missing_reference(field)
}
