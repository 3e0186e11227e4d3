//! Builders for the facade ports and shared HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use hbnb_backend::domain::{FacadePorts, RentalFacade};
use hbnb_backend::inbound::http::state::HttpState;
use hbnb_backend::outbound::BcryptPasswordHasher;
use hbnb_backend::outbound::persistence::{
    DbPool, DieselAmenityRepository, DieselPlaceRepository, DieselReviewRepository,
    DieselUserRepository, MemoryAmenityRepository, MemoryPlaceRepository, MemoryReviewRepository,
    MemoryStore, MemoryUserRepository,
};

/// Wire the repositories, password hasher and system clock.
///
/// Repositories are PostgreSQL-backed when a pool is available and share a
/// fresh [`MemoryStore`] otherwise.
pub(crate) fn build_facade(pool: Option<&DbPool>) -> Arc<RentalFacade> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let passwords = Arc::new(BcryptPasswordHasher::default());
    let ports = match pool {
        Some(pool) => FacadePorts {
            users: Arc::new(DieselUserRepository::new(pool.clone(), clock.clone())),
            amenities: Arc::new(DieselAmenityRepository::new(pool.clone(), clock.clone())),
            places: Arc::new(DieselPlaceRepository::new(pool.clone(), clock.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone(), clock.clone())),
            passwords,
            clock,
        },
        None => {
            let store = Arc::new(MemoryStore::new());
            FacadePorts {
                users: Arc::new(MemoryUserRepository::new(store.clone(), clock.clone())),
                amenities: Arc::new(MemoryAmenityRepository::new(store.clone(), clock.clone())),
                places: Arc::new(MemoryPlaceRepository::new(store.clone(), clock.clone())),
                reviews: Arc::new(MemoryReviewRepository::new(store, clock.clone())),
                passwords,
                clock,
            }
        }
    };
    Arc::new(RentalFacade::new(ports))
}

/// Build the shared HTTP state around `facade`.
pub(crate) fn build_http_state(facade: Arc<RentalFacade>) -> actix_web::web::Data<HttpState> {
    actix_web::web::Data::new(HttpState::new(facade))
}
