//! PostgreSQL-backed `PlaceRepository`, including the `place_amenities` join.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::entity::patched;
use crate::domain::facade::PLACE_AMENITY;
use crate::domain::ports::{PersistenceError, PlaceRepository};
use crate::domain::{AmenityId, Entity, Place, PlaceId, PlacePatch, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{PlaceRecord, PlaceRow, amenity_links};
use super::not_found;
use super::pool::DbPool;
use super::schema::{place_amenities, places, reviews};

/// Diesel adapter for listings.
///
/// Owner and amenity references are foreign keys, so a write naming a
/// missing row fails inside the database rather than racing a check.
#[derive(Clone)]
pub struct DieselPlaceRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselPlaceRepository {
    /// Repository over `pool`, stamping updates with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

async fn linked_amenities<C>(
    conn: &mut C,
    place_ids: Vec<Uuid>,
) -> QueryResult<HashMap<Uuid, BTreeSet<AmenityId>>>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let rows: Vec<(Uuid, Uuid)> = place_amenities::table
        .filter(place_amenities::place_id.eq_any(place_ids))
        .select((place_amenities::place_id, place_amenities::amenity_id))
        .load(conn)
        .await?;
    let mut links: HashMap<Uuid, BTreeSet<AmenityId>> = HashMap::new();
    for (place_id, amenity_id) in rows {
        links
            .entry(place_id)
            .or_default()
            .insert(AmenityId::from_uuid(amenity_id));
    }
    Ok(links)
}

async fn with_amenities<C>(conn: &mut C, rows: Vec<PlaceRow>) -> Result<Vec<Place>, PersistenceError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let ids = rows.iter().map(|row| row.id).collect();
    let mut links = linked_amenities(conn, ids).await?;
    rows.into_iter()
        .map(|row| {
            let amenity_ids = links.remove(&row.id).unwrap_or_default();
            row.into_domain(amenity_ids)
        })
        .collect()
}

/// Read a place and hold its row lock until the transaction ends.
async fn lock_place<C>(conn: &mut C, id: &PlaceId) -> Result<Place, PersistenceError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let row = places::table
        .find(*id.as_uuid())
        .select(PlaceRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| not_found::<Place>(id))?;
    with_amenities(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| not_found::<Place>(id))
}

async fn touch_place<C>(conn: &mut C, place: &Place) -> QueryResult<usize>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    diesel::update(places::table.find(*place.id().as_uuid()))
        .set(places::updated_at.eq(place.updated_at()))
        .execute(conn)
        .await
}

fn link_key(place_id: &PlaceId, amenity_id: &AmenityId) -> String {
    format!("{place_id}/{amenity_id}")
}

#[async_trait]
impl PlaceRepository for DieselPlaceRepository {
    async fn add(&self, place: &Place) -> Result<(), PersistenceError> {
        let links = amenity_links(place);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(places::table)
                    .values(PlaceRecord::from(place))
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(place_amenities::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn get(&self, id: &PlaceId) -> Result<Option<Place>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = places::table
            .find(*id.as_uuid())
            .select(PlaceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => Ok(with_amenities(&mut conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Place>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = places::table
            .order_by(places::ordinal)
            .select(PlaceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_amenities(&mut conn, rows).await
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Place>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = places::table
            .filter(places::owner_id.eq(*owner_id.as_uuid()))
            .order_by(places::ordinal)
            .select(PlaceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_amenities(&mut conn, rows).await
    }

    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<Place, PersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let current = lock_place(conn, id).await?;
                let next = patched(&current, patch, now).map_err(PersistenceError::validation)?;
                diesel::update(places::table.find(*id.as_uuid()))
                    .set(PlaceRecord::from(&next))
                    .execute(conn)
                    .await?;
                if patch.amenities.is_some() {
                    diesel::delete(
                        place_amenities::table.filter(place_amenities::place_id.eq(*id.as_uuid())),
                    )
                    .execute(conn)
                    .await?;
                    let links = amenity_links(&next);
                    if !links.is_empty() {
                        diesel::insert_into(place_amenities::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                }
                Ok(next)
            }
            .scope_boxed()
        })
        .await
    }

    async fn attach_amenity(
        &self,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, PersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut next = lock_place(conn, place_id).await?;
                if !next.attach_amenity(amenity_id.clone()) {
                    return Err(PersistenceError::duplicate(PLACE_AMENITY));
                }
                diesel::insert_into(place_amenities::table)
                    .values((
                        place_amenities::place_id.eq(*place_id.as_uuid()),
                        place_amenities::amenity_id.eq(*amenity_id.as_uuid()),
                    ))
                    .execute(conn)
                    .await?;
                next.touch(now);
                touch_place(conn, &next).await?;
                Ok(next)
            }
            .scope_boxed()
        })
        .await
    }

    async fn detach_amenity(
        &self,
        place_id: &PlaceId,
        amenity_id: &AmenityId,
    ) -> Result<Place, PersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut next = lock_place(conn, place_id).await?;
                let removed = diesel::delete(
                    place_amenities::table
                        .filter(place_amenities::place_id.eq(*place_id.as_uuid()))
                        .filter(place_amenities::amenity_id.eq(*amenity_id.as_uuid())),
                )
                .execute(conn)
                .await?;
                if removed == 0 || !next.detach_amenity(amenity_id) {
                    return Err(PersistenceError::not_found(
                        PLACE_AMENITY,
                        link_key(place_id, amenity_id),
                    ));
                }
                next.touch(now);
                touch_place(conn, &next).await?;
                Ok(next)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: &PlaceId) -> Result<usize, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let reviews_removed =
                    diesel::delete(reviews::table.filter(reviews::place_id.eq(*id.as_uuid())))
                        .execute(conn)
                        .await?;
                let removed = diesel::delete(places::table.find(*id.as_uuid()))
                    .execute(conn)
                    .await?;
                if removed == 0 {
                    return Err(not_found::<Place>(id));
                }
                Ok(reviews_removed)
            }
            .scope_boxed()
        })
        .await
    }
}
