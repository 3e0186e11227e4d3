//! PostgreSQL-backed `AmenityRepository`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::ports::{AmenityRepository, PersistenceError};
use crate::domain::{Amenity, AmenityId, AmenityPatch};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AmenityRecord, AmenityRow, into_domain_all};
use super::not_found;
use super::pool::DbPool;
use super::schema::amenities;

/// Diesel adapter for the amenity catalogue. Deleting an amenity drops its
/// place links through the join table's cascade.
#[derive(Clone)]
pub struct DieselAmenityRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselAmenityRepository {
    /// Repository over `pool`, stamping updates with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl AmenityRepository for DieselAmenityRepository {
    async fn add(&self, amenity: &Amenity) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(amenities::table)
            .values(AmenityRecord::from(amenity))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn get(&self, id: &AmenityId) -> Result<Option<Amenity>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        amenities::table
            .find(*id.as_uuid())
            .select(AmenityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(AmenityRow::into_domain)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Amenity>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = amenities::table
            .order_by(amenities::ordinal)
            .select(AmenityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_all(rows, AmenityRow::into_domain)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Amenity>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        amenities::table
            .filter(amenities::name.eq(name))
            .select(AmenityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(AmenityRow::into_domain)
            .transpose()
    }

    async fn update(
        &self,
        id: &AmenityId,
        patch: &AmenityPatch,
    ) -> Result<Amenity, PersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let current = amenities::table
                    .find(*id.as_uuid())
                    .select(AmenityRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or_else(|| not_found::<Amenity>(id))?
                    .into_domain()?;
                let next = patched(&current, patch, now).map_err(PersistenceError::validation)?;
                diesel::update(amenities::table.find(*id.as_uuid()))
                    .set(AmenityRecord::from(&next))
                    .execute(conn)
                    .await?;
                Ok(next)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: &AmenityId) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(amenities::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if removed == 0 {
            return Err(not_found::<Amenity>(id));
        }
        Ok(())
    }
}
