//! In-memory `PlaceRepository` adapter, including the place-amenity join.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::facade::PLACE_AMENITY;
use crate::domain::ports::{PersistenceError, PlaceRepository};
use crate::domain::{Amenity, AmenityId, Entity, Place, PlaceId, PlacePatch, UserId};

use super::memory_store::{MemoryStore, missing};
use super::memory_table::Rows;

/// Process-local place storage. Amenity links live on the place row.
pub struct MemoryPlaceRepository {
    store: Arc<MemoryStore>,
    clock: Arc<dyn Clock>,
}

impl MemoryPlaceRepository {
    /// Places kept in `store`, stamped by `clock`.
    pub fn new(store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

fn link_key(place_id: &PlaceId, amenity_id: &AmenityId) -> String {
    format!("{place_id}/{amenity_id}")
}

fn check_amenities<'a>(
    amenities: &Rows<'_, Amenity>,
    mut ids: impl Iterator<Item = &'a AmenityId>,
) -> Result<(), PersistenceError> {
    if ids.any(|id| !amenities.contains(id)) {
        return Err(missing("amenities"));
    }
    Ok(())
}

#[async_trait]
impl PlaceRepository for MemoryPlaceRepository {
    async fn add(&self, place: &Place) -> Result<(), PersistenceError> {
        let users = self.store.users.lock()?;
        let amenities = self.store.amenities.lock()?;
        let mut places = self.store.places.lock()?;
        if !users.contains(place.owner_id()) {
            return Err(missing("owner_id"));
        }
        check_amenities(&amenities, place.amenity_ids().iter())?;
        places.insert(place)
    }

    async fn get(&self, id: &PlaceId) -> Result<Option<Place>, PersistenceError> {
        self.store.places.get(id)
    }

    async fn get_all(&self) -> Result<Vec<Place>, PersistenceError> {
        self.store.places.all()
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Place>, PersistenceError> {
        self.store.places.filter(|place| place.owner_id() == owner_id)
    }

    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<Place, PersistenceError> {
        let now = self.clock.utc();
        let amenities = self.store.amenities.lock()?;
        let mut places = self.store.places.lock()?;
        if let Some(ids) = &patch.amenities {
            check_amenities(&amenities, ids.iter())?;
        }
        places.replace_with(id, |place| {
            patched(place, patch, now).map_err(PersistenceError::validation)
        })
    }

    async fn attach_amenity(
        &self,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, PersistenceError> {
        let now = self.clock.utc();
        let amenities = self.store.amenities.lock()?;
        let mut places = self.store.places.lock()?;
        places.replace_with(place_id, |place| {
            check_amenities(&amenities, std::iter::once(amenity_id))?;
            let mut next = place.clone();
            if !next.attach_amenity(amenity_id.clone()) {
                return Err(PersistenceError::duplicate(PLACE_AMENITY));
            }
            next.touch(now);
            Ok(next)
        })
    }

    async fn detach_amenity(
        &self,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, PersistenceError> {
        let now = self.clock.utc();
        self.store.places.replace_with(place_id, |place| {
            let mut next = place.clone();
            if !next.detach_amenity(amenity_id) {
                return Err(PersistenceError::not_found(
                    PLACE_AMENITY,
                    link_key(place_id, amenity_id),
                ));
            }
            next.touch(now);
            Ok(next)
        })
    }

    async fn delete(&self, id: &PlaceId) -> Result<usize, PersistenceError> {
        let mut places = self.store.places.lock()?;
        let mut reviews = self.store.reviews.lock()?;
        places.remove(id)?;
        Ok(reviews.remove_where(|review| review.place_id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordDigest, PlaceDraft, Review, User};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    struct Fixture {
        store: Arc<MemoryStore>,
        repo: MemoryPlaceRepository,
    }

    impl Fixture {
        fn owner(&self, email: &str) -> UserId {
            let user = User::new(
                "Host",
                "Person",
                email,
                PasswordDigest::from_encoded("digest"),
                DefaultClock.utc(),
            )
            .expect("valid user");
            self.store.users.insert(&user).expect("insert user");
            user.id().clone()
        }

        fn amenity(&self, name: &str) -> AmenityId {
            let amenity = Amenity::new(name, DefaultClock.utc()).expect("valid amenity");
            self.store.amenities.insert(&amenity).expect("insert amenity");
            amenity.id().clone()
        }
    }

    #[fixture]
    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let repo = MemoryPlaceRepository::new(store.clone(), Arc::new(DefaultClock));
        Fixture { store, repo }
    }

    fn place(owner: &UserId) -> Place {
        let draft = PlaceDraft {
            title: "Loft".to_owned(),
            description: String::new(),
            price: 80.0,
            latitude: 48.85,
            longitude: 2.35,
        };
        Place::new(draft, owner.clone(), DefaultClock.utc()).expect("valid place")
    }

    #[rstest]
    #[tokio::test]
    async fn attach_twice_is_a_duplicate(fixture: Fixture) {
        let loft = place(&fixture.owner("host@example.com"));
        let wifi = fixture.amenity("Wi-Fi");
        fixture.repo.add(&loft).await.expect("insert");

        let linked = fixture
            .repo
            .attach_amenity(loft.id(), &wifi)
            .await
            .expect("attach");
        assert!(linked.has_amenity(&wifi));
        assert!(linked.updated_at() > loft.updated_at());

        let err = fixture
            .repo
            .attach_amenity(loft.id(), &wifi)
            .await
            .expect_err("already linked");
        assert_eq!(err, PersistenceError::duplicate(PLACE_AMENITY));
    }

    #[rstest]
    #[tokio::test]
    async fn detach_missing_link_is_not_found(fixture: Fixture) {
        let loft = place(&fixture.owner("host@example.com"));
        fixture.repo.add(&loft).await.expect("insert");

        let err = fixture
            .repo
            .detach_amenity(loft.id(), &AmenityId::random())
            .await
            .expect_err("nothing linked");

        assert!(matches!(err, PersistenceError::NotFound { ref entity, .. } if entity == PLACE_AMENITY));
        let stored = fixture.repo.get(loft.id()).await.expect("read").expect("present");
        assert_eq!(stored.updated_at(), loft.updated_at());
    }

    #[rstest]
    #[tokio::test]
    async fn lists_places_by_owner(fixture: Fixture) {
        let alice = fixture.owner("alice@example.com");
        let bob = fixture.owner("bob@example.com");
        fixture.repo.add(&place(&alice)).await.expect("insert");
        fixture.repo.add(&place(&bob)).await.expect("insert");
        fixture.repo.add(&place(&alice)).await.expect("insert");

        let owned = fixture.repo.list_by_owner(&alice).await.expect("query");

        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|p| p.owner_id() == &alice));
    }

    #[rstest]
    #[tokio::test]
    async fn rows_must_reference_existing_owner_and_amenities(fixture: Fixture) {
        let err = fixture
            .repo
            .add(&place(&UserId::random()))
            .await
            .expect_err("unknown owner");
        assert_eq!(err, PersistenceError::missing_reference("owner_id"));

        let mut loft = place(&fixture.owner("host@example.com"));
        loft.attach_amenity(AmenityId::random());
        let err = fixture.repo.add(&loft).await.expect_err("unknown amenity");
        assert_eq!(err, PersistenceError::missing_reference("amenities"));
        assert!(fixture.repo.get_all().await.expect("query").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn attaching_an_unknown_amenity_writes_nothing(fixture: Fixture) {
        let loft = place(&fixture.owner("host@example.com"));
        fixture.repo.add(&loft).await.expect("insert");

        let err = fixture
            .repo
            .attach_amenity(loft.id(), &AmenityId::random())
            .await
            .expect_err("unknown amenity");

        assert_eq!(err, PersistenceError::missing_reference("amenities"));
        let stored = fixture.repo.get(loft.id()).await.expect("read").expect("present");
        assert_eq!(stored, loft);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_cascades_to_reviews_of_that_place_only(fixture: Fixture) {
        let host = fixture.owner("host@example.com");
        let guest = fixture.owner("guest@example.com");
        let doomed = place(&host);
        let kept = place(&host);
        fixture.repo.add(&doomed).await.expect("insert");
        fixture.repo.add(&kept).await.expect("insert");
        for target in [&doomed, &kept] {
            let review = Review::new(
                "Great",
                5,
                target.id().clone(),
                guest.clone(),
                DefaultClock.utc(),
            )
            .expect("valid review");
            fixture.store.reviews.insert(&review).expect("insert review");
        }

        let removed = fixture.repo.delete(doomed.id()).await.expect("delete");

        assert_eq!(removed, 1);
        let left = fixture.store.reviews.all().expect("reviews");
        assert_eq!(left.len(), 1);
        assert!(left.iter().all(|review| review.place_id() == kept.id()));
    }
}
