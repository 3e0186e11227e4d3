//! Domain ports defining the edges of the hexagon.
//!
//! Repositories own one entity type each. The facade talks only to these
//! traits, so adapters can be swapped without touching business rules.

mod macros;
pub(crate) use macros::define_port_error;

mod amenity_repository;
mod login_service;
mod password_hasher;
mod persistence_error;
mod place_repository;
mod review_repository;
mod user_repository;

pub use amenity_repository::AmenityRepository;
#[cfg(test)]
pub use amenity_repository::MockAmenityRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use place_repository::MockPlaceRepository;
pub use place_repository::PlaceRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::ReviewRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
