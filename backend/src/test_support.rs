//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{FacadePorts, RentalFacade};
use crate::outbound::BcryptPasswordHasher;
use crate::outbound::persistence::{
    MemoryAmenityRepository, MemoryPlaceRepository, MemoryReviewRepository, MemoryStore,
    MemoryUserRepository,
};

pub use crate::inbound::http::test_utils::test_session_middleware;

/// bcrypt cost used by test facades; real strength is irrelevant here.
pub const TEST_HASH_COST: u32 = crate::outbound::password_hasher::MIN_COST;

/// Manually driven clock. Time only moves when a test moves it.
///
/// # Examples
/// ```
/// use chrono::TimeDelta;
/// use hbnb_backend::test_support::MutableClock;
/// use mockable::Clock;
///
/// let clock = MutableClock::default();
/// let before = clock.utc();
/// clock.advance(TimeDelta::seconds(5));
/// assert_eq!(clock.utc() - before, TimeDelta::seconds(5));
/// ```
#[derive(Debug)]
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        Self::new(start)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Facade ports backed by one fresh [`MemoryStore`], stamped by `clock`.
pub fn memory_ports(clock: Arc<dyn Clock>) -> FacadePorts {
    let store = Arc::new(MemoryStore::new());
    FacadePorts {
        users: Arc::new(MemoryUserRepository::new(store.clone(), clock.clone())),
        amenities: Arc::new(MemoryAmenityRepository::new(store.clone(), clock.clone())),
        places: Arc::new(MemoryPlaceRepository::new(store.clone(), clock.clone())),
        reviews: Arc::new(MemoryReviewRepository::new(store, clock.clone())),
        passwords: Arc::new(BcryptPasswordHasher::new(TEST_HASH_COST)),
        clock,
    }
}

/// An empty in-memory facade and the clock driving its timestamps.
pub fn memory_facade() -> (RentalFacade, Arc<MutableClock>) {
    let clock = Arc::new(MutableClock::default());
    let facade = RentalFacade::new(memory_ports(clock.clone()));
    (facade, clock)
}
