//! Behavioural properties of the rental facade over the in-memory adapters.
//!
//! Each test builds a fresh facade so stores never leak between cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use hbnb_backend::domain::ports::{PersistenceError, PlaceRepository, ReviewRepository};
use hbnb_backend::domain::{
    Actor, AmenityId, AmenityUpdate, ErrorCode, NewAmenity, NewPlace, NewReview, NewUser,
    Password, PlaceId, PlaceUpdate, RentalFacade, Review, ReviewId, ReviewPatch, ReviewUpdate,
    User, UserId, UserUpdate,
};
use hbnb_backend::test_support::{MutableClock, memory_facade, memory_ports};
use rstest::{fixture, rstest};

struct World {
    facade: RentalFacade,
    clock: Arc<MutableClock>,
    admin: Actor,
}

#[fixture]
fn world() -> World {
    let (facade, clock) = memory_facade();
    World {
        facade,
        clock,
        admin: Actor::system(),
    }
}

fn registration(email: &str) -> NewUser {
    NewUser {
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        email: email.to_owned(),
        password: Password::new("correct horse").expect("valid password"),
    }
}

fn actor_for(user: &User) -> Actor {
    Actor::new(user.id().clone(), user.is_admin())
}

fn listing(title: &str) -> NewPlace {
    NewPlace {
        title: title.to_owned(),
        description: None,
        price: 250.0,
        latitude: 34.05,
        longitude: -118.24,
        owner_id: None,
        amenities: Vec::new(),
    }
}

fn review(place: &hbnb_backend::domain::Place, rating: i64) -> NewReview {
    NewReview {
        text: "Lovely stay".to_owned(),
        rating,
        place_id: place.id().clone(),
    }
}

impl World {
    async fn register(&self, email: &str) -> User {
        self.facade
            .create_user(registration(email))
            .await
            .expect("registration succeeds")
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_a_conflict(world: World) {
    world.register("alice@example.com").await;

    let err = world
        .facade
        .create_user(registration("alice@example.com"))
        .await
        .expect_err("second registration rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(world.facade.list_users().await.expect("list users").len(), 1);
}

#[rstest]
#[tokio::test]
async fn unknown_owner_never_creates_a_place(world: World) {
    let mut new_place = listing("Ghost house");
    new_place.owner_id = Some(UserId::random());

    let err = world
        .facade
        .create_place(&world.admin, new_place)
        .await
        .expect_err("unknown owner rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Owner not found");
    assert!(world.facade.list_places().await.expect("list places").is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_owner_is_reported_before_authorization(world: World) {
    let alice = world.register("alice@example.com").await;
    let mut new_place = listing("Ghost house");
    new_place.owner_id = Some(UserId::random());

    let err = world
        .facade
        .create_place(&actor_for(&alice), new_place)
        .await
        .expect_err("unknown owner rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Owner not found");
    assert!(world.facade.list_places().await.expect("list places").is_empty());
}

#[rstest]
#[tokio::test]
async fn placing_a_listing_under_another_user_is_forbidden(world: World) {
    let alice = world.register("alice@example.com").await;
    let bob = world.register("bob@example.com").await;
    let mut new_place = listing("Borrowed flat");
    new_place.owner_id = Some(bob.id().clone());

    let err = world
        .facade
        .create_place(&actor_for(&alice), new_place.clone())
        .await
        .expect_err("regular users list only for themselves");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let created = world
        .facade
        .create_place(&world.admin, new_place)
        .await
        .expect("admins list for anyone");
    assert_eq!(created.owner_id(), bob.id());
}

#[rstest]
#[case::on_create(false)]
#[case::on_update(true)]
#[tokio::test]
async fn unknown_amenity_is_named_in_the_error(world: World, #[case] via_update: bool) {
    let host = world.register("host@example.com").await;
    let host_actor = actor_for(&host);
    let stray = AmenityId::random();

    let result = if via_update {
        let place = world
            .facade
            .create_place(&host_actor, listing("Chalet"))
            .await
            .expect("place created");
        world
            .facade
            .update_place(
                &host_actor,
                place.id(),
                PlaceUpdate {
                    amenities: Some(vec![stray.clone()]),
                    ..PlaceUpdate::default()
                },
            )
            .await
    } else {
        let mut new_place = listing("Chalet");
        new_place.amenities = vec![stray.clone()];
        world.facade.create_place(&host_actor, new_place).await
    };

    let err = result.expect_err("unknown amenity rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), format!("Amenity {stray} not found"));
    let details = err.details().expect("details attached");
    assert_eq!(details["field"], "amenities");
    assert_eq!(details["code"], "unknown_reference");
    assert_eq!(details["id"], stray.to_string());
}

#[rstest]
#[tokio::test]
async fn owner_review_is_rejected_regardless_of_rating(world: World) {
    let alice = world.register("alice@example.com").await;
    let place = world
        .facade
        .create_place(&actor_for(&alice), listing("Cottage"))
        .await
        .expect("place created");

    for rating in [0, 3, 9] {
        let err = world
            .facade
            .create_review(&actor_for(&alice), review(&place, rating))
            .await
            .expect_err("owners cannot review their listing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "cannot review own place");
    }
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(5, true)]
#[case(6, false)]
#[tokio::test]
async fn rating_boundaries(world: World, #[case] rating: i64, #[case] accepted: bool) {
    let host = world.register("host@example.com").await;
    let guest = world.register("guest@example.com").await;
    let place = world
        .facade
        .create_place(&actor_for(&host), listing("Loft"))
        .await
        .expect("place created");

    let result = world
        .facade
        .create_review(&actor_for(&guest), review(&place, rating))
        .await;

    match result {
        Ok(stored) => {
            assert!(accepted, "rating {rating} should be rejected");
            assert_eq!(i64::from(stored.rating()), rating);
        }
        Err(err) => {
            assert!(!accepted, "rating {rating} should be accepted");
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
        }
    }
}

#[rstest]
#[tokio::test]
async fn alice_and_bob_review_scenario(world: World) {
    let alice = world.register("alice@example.com").await;
    let place = world
        .facade
        .create_place(&actor_for(&alice), listing("Downtown loft"))
        .await
        .expect("place created");
    assert_eq!(place.owner_id(), alice.id());
    assert_eq!(place.description(), "");

    let own = world
        .facade
        .create_review(&actor_for(&alice), review(&place, 4))
        .await
        .expect_err("self review rejected");
    assert_eq!(own.code(), ErrorCode::InvalidRequest);

    let bob = world.register("bob@example.com").await;
    let first = world
        .facade
        .create_review(&actor_for(&bob), review(&place, 5))
        .await
        .expect("bob reviews the place");
    assert_eq!(first.user_id(), bob.id());

    let second = world
        .facade
        .create_review(&actor_for(&bob), review(&place, 3))
        .await
        .expect_err("duplicate review rejected");
    assert_eq!(second.code(), ErrorCode::Conflict);

    let reviews = world
        .facade
        .get_reviews_by_place(place.id())
        .await
        .expect("reviews listed");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].id(), first.id());
}

#[rstest]
#[tokio::test]
async fn regular_users_edit_only_their_own_names(world: World) {
    let alice = world.register("alice@example.com").await;
    let bob = world.register("bob@example.com").await;
    let rename = UserUpdate {
        first_name: Some("Robert".to_owned()),
        ..UserUpdate::default()
    };

    let err = world
        .facade
        .update_user(&actor_for(&alice), bob.id(), rename.clone())
        .await
        .expect_err("cannot edit another user");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let updated = world
        .facade
        .update_user(&actor_for(&bob), bob.id(), rename)
        .await
        .expect("self rename succeeds");
    assert_eq!(updated.first_name(), "Robert");
    assert_eq!(updated.email().as_str(), "bob@example.com");
}

#[rstest]
#[tokio::test]
async fn only_admins_change_identity_fields(world: World) {
    let bob = world.register("bob@example.com").await;

    let email_change = UserUpdate {
        email: Some("robert@example.com".to_owned()),
        ..UserUpdate::default()
    };
    let err = world
        .facade
        .update_user(&actor_for(&bob), bob.id(), email_change.clone())
        .await
        .expect_err("self-service email change rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let promotion = UserUpdate {
        is_admin: Some(true),
        ..UserUpdate::default()
    };
    let err = world
        .facade
        .update_user(&actor_for(&bob), bob.id(), promotion)
        .await
        .expect_err("self promotion rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let updated = world
        .facade
        .update_user(&world.admin, bob.id(), email_change)
        .await
        .expect("admin changes email");
    assert_eq!(updated.email().as_str(), "robert@example.com");
}

#[rstest]
#[tokio::test]
async fn admin_email_change_keeps_uniqueness(world: World) {
    world.register("alice@example.com").await;
    let bob = world.register("bob@example.com").await;

    let err = world
        .facade
        .update_user(
            &world.admin,
            bob.id(),
            UserUpdate {
                email: Some("alice@example.com".to_owned()),
                ..UserUpdate::default()
            },
        )
        .await
        .expect_err("taken email rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);

    let unchanged = world
        .facade
        .update_user(
            &world.admin,
            bob.id(),
            UserUpdate {
                email: Some("bob@example.com".to_owned()),
                ..UserUpdate::default()
            },
        )
        .await
        .expect("keeping the same email is allowed");
    assert_eq!(unchanged.email().as_str(), "bob@example.com");
}

#[rstest]
#[tokio::test]
async fn amenity_rename_moves_updated_at_forward(world: World) {
    let amenity = world
        .facade
        .create_amenity(
            &world.admin,
            NewAmenity {
                name: "Wi-Fi".to_owned(),
            },
        )
        .await
        .expect("amenity created");
    world.clock.advance(TimeDelta::seconds(1));

    world
        .facade
        .update_amenity(
            &world.admin,
            amenity.id(),
            AmenityUpdate {
                name: Some("Pool".to_owned()),
            },
        )
        .await
        .expect("rename succeeds");

    let stored = world
        .facade
        .get_amenity(amenity.id())
        .await
        .expect("amenity stored");
    assert_eq!(stored.name(), "Pool");
    assert!(stored.updated_at() > amenity.updated_at());
    assert_eq!(stored.created_at(), amenity.created_at());
}

#[rstest]
#[tokio::test]
async fn updated_at_advances_without_clock_movement(world: World) {
    let alice = world.register("alice@example.com").await;

    let renamed = world
        .facade
        .update_user(
            &actor_for(&alice),
            alice.id(),
            UserUpdate {
                last_name: Some("Jones".to_owned()),
                ..UserUpdate::default()
            },
        )
        .await
        .expect("rename succeeds");

    assert!(renamed.updated_at() > alice.updated_at());
}

#[rstest]
#[tokio::test]
async fn amenity_names_are_unique_and_admin_gated(world: World) {
    let pool = NewAmenity {
        name: "Pool".to_owned(),
    };
    world
        .facade
        .create_amenity(&world.admin, pool.clone())
        .await
        .expect("amenity created");

    let duplicate = world
        .facade
        .create_amenity(&world.admin, pool.clone())
        .await
        .expect_err("duplicate name rejected");
    assert_eq!(duplicate.code(), ErrorCode::Conflict);

    let lowercase = world
        .facade
        .create_amenity(
            &world.admin,
            NewAmenity {
                name: "pool".to_owned(),
            },
        )
        .await;
    assert!(lowercase.is_ok(), "names compare case-sensitively");

    let regular = Actor::new(UserId::random(), false);
    let forbidden = world
        .facade
        .create_amenity(&regular, pool)
        .await
        .expect_err("regular users cannot create amenities");
    assert_eq!(forbidden.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn amenity_links_conflict_on_repeat(world: World) {
    let host = world.register("host@example.com").await;
    let host_actor = actor_for(&host);
    let place = world
        .facade
        .create_place(&host_actor, listing("Cabin"))
        .await
        .expect("place created");
    let wifi = world
        .facade
        .create_amenity(
            &world.admin,
            NewAmenity {
                name: "Wi-Fi".to_owned(),
            },
        )
        .await
        .expect("amenity created");

    let linked = world
        .facade
        .add_amenity_to_place(&host_actor, place.id(), wifi.id())
        .await
        .expect("first link succeeds");
    assert!(linked.has_amenity(wifi.id()));
    let again = world
        .facade
        .add_amenity_to_place(&host_actor, place.id(), wifi.id())
        .await
        .expect_err("second link rejected");
    assert_eq!(again.code(), ErrorCode::Conflict);

    let unlinked = world
        .facade
        .remove_amenity_from_place(&host_actor, place.id(), wifi.id())
        .await
        .expect("first removal succeeds");
    assert!(!unlinked.has_amenity(wifi.id()));
    let again = world
        .facade
        .remove_amenity_from_place(&host_actor, place.id(), wifi.id())
        .await
        .expect_err("second removal rejected");
    assert_eq!(again.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn place_update_replaces_amenities_and_keeps_owner(world: World) {
    let host = world.register("host@example.com").await;
    let other = world.register("other@example.com").await;
    let wifi = world
        .facade
        .create_amenity(&world.admin, NewAmenity { name: "Wi-Fi".to_owned() })
        .await
        .expect("amenity created");
    let parking = world
        .facade
        .create_amenity(&world.admin, NewAmenity { name: "Parking".to_owned() })
        .await
        .expect("amenity created");
    let mut new_place = listing("Flat");
    new_place.amenities = vec![wifi.id().clone()];
    let place = world
        .facade
        .create_place(&actor_for(&host), new_place)
        .await
        .expect("place created");

    let updated = world
        .facade
        .update_place(
            &actor_for(&host),
            place.id(),
            PlaceUpdate {
                price: Some(300.0),
                owner_id: Some(other.id().clone()),
                amenities: Some(vec![parking.id().clone()]),
                ..PlaceUpdate::default()
            },
        )
        .await
        .expect("owner updates listing");

    assert_eq!(updated.owner_id(), host.id());
    assert_eq!(updated.price(), 300.0);
    assert!(updated.has_amenity(parking.id()));
    assert!(!updated.has_amenity(wifi.id()));

    let forbidden = world
        .facade
        .update_place(&actor_for(&other), place.id(), PlaceUpdate::default())
        .await
        .expect_err("non-owners cannot update");
    assert_eq!(forbidden.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn deleting_a_place_cascades_to_reviews_only(world: World) {
    let host = world.register("host@example.com").await;
    let guest = world.register("guest@example.com").await;
    let wifi = world
        .facade
        .create_amenity(&world.admin, NewAmenity { name: "Wi-Fi".to_owned() })
        .await
        .expect("amenity created");
    let mut new_place = listing("Barn");
    new_place.amenities = vec![wifi.id().clone()];
    let place = world
        .facade
        .create_place(&actor_for(&host), new_place)
        .await
        .expect("place created");
    let written = world
        .facade
        .create_review(&actor_for(&guest), review(&place, 4))
        .await
        .expect("review created");

    world
        .facade
        .delete_place(&actor_for(&host), place.id())
        .await
        .expect("owner deletes listing");

    let missing = world
        .facade
        .get_place(place.id())
        .await
        .expect_err("place gone");
    assert_eq!(missing.code(), ErrorCode::NotFound);
    let review_gone = world
        .facade
        .get_review(written.id())
        .await
        .expect_err("review cascaded");
    assert_eq!(review_gone.code(), ErrorCode::NotFound);
    world
        .facade
        .get_amenity(wifi.id())
        .await
        .expect("amenity survives");
    let by_place = world
        .facade
        .get_reviews_by_place(place.id())
        .await
        .expect_err("reviews of a missing place");
    assert_eq!(by_place.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn reviews_cannot_be_reparented(world: World) {
    let host = world.register("host@example.com").await;
    let guest = world.register("guest@example.com").await;
    let first = world
        .facade
        .create_place(&actor_for(&host), listing("First"))
        .await
        .expect("place created");
    let second = world
        .facade
        .create_place(&actor_for(&host), listing("Second"))
        .await
        .expect("place created");
    let written = world
        .facade
        .create_review(&actor_for(&guest), review(&first, 4))
        .await
        .expect("review created");

    let echoed = world
        .facade
        .update_review(
            &actor_for(&guest),
            written.id(),
            ReviewUpdate {
                rating: Some(2),
                place_id: Some(first.id().clone()),
                ..ReviewUpdate::default()
            },
        )
        .await
        .expect("echoing the parent is accepted");
    assert_eq!(echoed.rating(), 2);

    let moved = world
        .facade
        .update_review(
            &actor_for(&guest),
            written.id(),
            ReviewUpdate {
                place_id: Some(second.id().clone()),
                ..ReviewUpdate::default()
            },
        )
        .await
        .expect_err("re-parenting rejected");
    assert_eq!(moved.code(), ErrorCode::InvalidRequest);

    let host_edit = world
        .facade
        .update_review(&actor_for(&host), written.id(), ReviewUpdate::default())
        .await
        .expect_err("only the author or an admin may edit");
    assert_eq!(host_edit.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case::unknown_place(true)]
#[case::unknown_author(false)]
#[tokio::test]
async fn reparenting_to_a_missing_row_reports_it(world: World, #[case] move_place: bool) {
    let host = world.register("host@example.com").await;
    let guest = world.register("guest@example.com").await;
    let place = world
        .facade
        .create_place(&actor_for(&host), listing("Yurt"))
        .await
        .expect("place created");
    let written = world
        .facade
        .create_review(&actor_for(&guest), review(&place, 4))
        .await
        .expect("review created");
    let (update, message) = if move_place {
        let update = ReviewUpdate {
            place_id: Some(PlaceId::random()),
            ..ReviewUpdate::default()
        };
        (update, "Place not found")
    } else {
        let update = ReviewUpdate {
            user_id: Some(UserId::random()),
            ..ReviewUpdate::default()
        };
        (update, "User not found")
    };

    let err = world
        .facade
        .update_review(&actor_for(&guest), written.id(), update)
        .await
        .expect_err("missing parent rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), message);
    let stored = world.facade.get_review(written.id()).await.expect("review kept");
    assert_eq!(stored.place_id(), place.id());
    assert_eq!(stored.user_id(), guest.id());
}

#[rstest]
#[tokio::test]
async fn reviews_are_deleted_by_their_author_or_an_admin(world: World) {
    let host = world.register("host@example.com").await;
    let first_guest = world.register("first@example.com").await;
    let second_guest = world.register("second@example.com").await;
    let place = world
        .facade
        .create_place(&actor_for(&host), listing("Riad"))
        .await
        .expect("place created");
    let first = world
        .facade
        .create_review(&actor_for(&first_guest), review(&place, 5))
        .await
        .expect("review created");
    let second = world
        .facade
        .create_review(&actor_for(&second_guest), review(&place, 3))
        .await
        .expect("review created");

    for stranger in [actor_for(&host), actor_for(&second_guest)] {
        let err = world
            .facade
            .delete_review(&stranger, first.id())
            .await
            .expect_err("only the author or an admin deletes");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    world
        .facade
        .delete_review(&actor_for(&first_guest), first.id())
        .await
        .expect("author deletes");
    world
        .facade
        .delete_review(&world.admin, second.id())
        .await
        .expect("admin deletes");

    assert!(
        world
            .facade
            .get_reviews_by_place(place.id())
            .await
            .expect("reviews listed")
            .is_empty()
    );
    let again = world
        .facade
        .delete_review(&world.admin, first.id())
        .await
        .expect_err("already gone");
    assert_eq!(again.code(), ErrorCode::NotFound);
}

/// Deletes the reviewed place between the facade's checks and the insert.
struct PlaceDeletedBeforeInsert {
    places: Arc<dyn PlaceRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

#[async_trait]
impl ReviewRepository for PlaceDeletedBeforeInsert {
    async fn add(&self, review: &Review) -> Result<(), PersistenceError> {
        self.places.delete(review.place_id()).await?;
        self.reviews.add(review).await
    }

    async fn get(&self, id: &ReviewId) -> Result<Option<Review>, PersistenceError> {
        self.reviews.get(id).await
    }

    async fn get_all(&self) -> Result<Vec<Review>, PersistenceError> {
        self.reviews.get_all().await
    }

    async fn list_by_place(&self, place_id: &PlaceId) -> Result<Vec<Review>, PersistenceError> {
        self.reviews.list_by_place(place_id).await
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Review>, PersistenceError> {
        self.reviews.list_by_user(user_id).await
    }

    async fn find_by_user_and_place(
        &self,
        user_id: &UserId,
        place_id: &PlaceId,
    ) -> Result<Option<Review>, PersistenceError> {
        self.reviews.find_by_user_and_place(user_id, place_id).await
    }

    async fn update(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<Review, PersistenceError> {
        self.reviews.update(id, patch).await
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), PersistenceError> {
        self.reviews.delete(id).await
    }
}

#[rstest]
#[tokio::test]
async fn review_for_a_place_deleted_mid_request_is_not_stored() {
    let clock = Arc::new(MutableClock::default());
    let mut ports = memory_ports(clock);
    ports.reviews = Arc::new(PlaceDeletedBeforeInsert {
        places: ports.places.clone(),
        reviews: ports.reviews.clone(),
    });
    let facade = RentalFacade::new(ports);
    let host = facade
        .create_user(registration("host@example.com"))
        .await
        .expect("registration succeeds");
    let guest = facade
        .create_user(registration("guest@example.com"))
        .await
        .expect("registration succeeds");
    let place = facade
        .create_place(&actor_for(&host), listing("Vanishing villa"))
        .await
        .expect("place created");

    let err = facade
        .create_review(&actor_for(&guest), review(&place, 5))
        .await
        .expect_err("review of a deleted place rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details attached");
    assert_eq!(details["field"], "place_id");
    assert_eq!(details["code"], "unknown_reference");
    assert!(facade.list_reviews().await.expect("list reviews").is_empty());
}

#[rstest]
#[tokio::test]
async fn review_queries_follow_creation_order(world: World) {
    let host = world.register("host@example.com").await;
    let place = world
        .facade
        .create_place(&actor_for(&host), listing("Hostel"))
        .await
        .expect("place created");
    let mut expected = Vec::new();
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        let guest = world.register(email).await;
        world.clock.advance(TimeDelta::seconds(1));
        let written = world
            .facade
            .create_review(&actor_for(&guest), review(&place, 5))
            .await
            .expect("review created");
        expected.push(written.id().clone());
    }

    let listed: Vec<_> = world
        .facade
        .get_reviews_by_place(place.id())
        .await
        .expect("reviews listed")
        .iter()
        .map(|review| review.id().clone())
        .collect();

    assert_eq!(listed, expected);
}

#[rstest]
#[tokio::test]
async fn per_user_queries_filter_by_owner_and_author(world: World) {
    let host = world.register("host@example.com").await;
    let guest = world.register("guest@example.com").await;
    let first = world
        .facade
        .create_place(&actor_for(&host), listing("First"))
        .await
        .expect("place created");
    world
        .facade
        .create_place(&actor_for(&guest), listing("Guest flat"))
        .await
        .expect("place created");
    let written = world
        .facade
        .create_review(&actor_for(&guest), review(&first, 4))
        .await
        .expect("review created");

    let hosted = world
        .facade
        .list_places_by_owner(host.id())
        .await
        .expect("owner listing");
    assert_eq!(hosted.len(), 1);
    assert_eq!(hosted[0].id(), first.id());

    let authored = world
        .facade
        .list_reviews_by_user(guest.id())
        .await
        .expect("author listing");
    assert_eq!(authored.len(), 1);
    assert_eq!(authored[0].id(), written.id());

    let found = world
        .facade
        .get_review_by_user_and_place(guest.id(), first.id())
        .await
        .expect("lookup succeeds");
    assert_eq!(found.map(|review| review.id().clone()), Some(written.id().clone()));

    let unknown = world
        .facade
        .list_places_by_owner(&UserId::random())
        .await
        .expect_err("unknown owner");
    assert_eq!(unknown.code(), ErrorCode::NotFound);
}
