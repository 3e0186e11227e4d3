//! Persistence adapters for the repository ports.
//!
//! Two families implement the same traits:
//!
//! - `Memory*Repository` keeps rows in a shared [`MemoryStore`]. Tables are
//!   mutex-guarded and insertion-ordered; writes that span tables lock them
//!   in a fixed order so reference checks and cascades are atomic.
//! - `Diesel*Repository` stores rows in PostgreSQL through `diesel-async`
//!   and a bb8 [`DbPool`]. Unique and foreign key constraints carry the same
//!   rules, and their violations map onto [`PersistenceError`] variants.
//!
//! Row structs and the schema stay private to this module.
//!
//! [`PersistenceError`]: crate::domain::ports::PersistenceError
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hbnb_backend::outbound::persistence::{MemoryStore, MemoryUserRepository};
//! use mockable::DefaultClock;
//!
//! let users = MemoryUserRepository::new(Arc::new(MemoryStore::new()), Arc::new(DefaultClock));
//! # let _ = users;
//! ```

mod diesel_amenity_repository;
mod diesel_error_mapping;
mod diesel_place_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod memory_amenity_repository;
mod memory_place_repository;
mod memory_review_repository;
mod memory_store;
mod memory_table;
mod memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

use crate::domain::Entity;
use crate::domain::ports::PersistenceError;

pub use diesel_amenity_repository::DieselAmenityRepository;
pub use diesel_place_repository::DieselPlaceRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use memory_amenity_repository::MemoryAmenityRepository;
pub use memory_place_repository::MemoryPlaceRepository;
pub use memory_review_repository::MemoryReviewRepository;
pub use memory_store::MemoryStore;
pub use memory_user_repository::MemoryUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

pub(crate) fn not_found<E: Entity>(id: &E::Id) -> PersistenceError {
    PersistenceError::not_found(E::KIND, id.to_string())
}
