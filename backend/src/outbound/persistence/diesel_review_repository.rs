//! PostgreSQL-backed `ReviewRepository`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::ports::{PersistenceError, ReviewRepository};
use crate::domain::{PlaceId, Review, ReviewId, ReviewPatch, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ReviewRecord, ReviewRow, into_domain_all};
use super::not_found;
use super::pool::DbPool;
use super::schema::reviews;

/// Diesel adapter for reviews.
///
/// The foreign key check on insert takes a share lock on the referenced
/// place, so a review can't land on a place whose delete is in flight.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselReviewRepository {
    /// Repository over `pool`, stamping updates with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn add(&self, review: &Review) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(reviews::table)
            .values(ReviewRecord::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn get(&self, id: &ReviewId) -> Result<Option<Review>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .find(*id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(ReviewRow::into_domain)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Review>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .order_by(reviews::ordinal)
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_all(rows, ReviewRow::into_domain)
    }

    async fn list_by_place(&self, place_id: &PlaceId) -> Result<Vec<Review>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .filter(reviews::place_id.eq(*place_id.as_uuid()))
            .order_by(reviews::ordinal)
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_all(rows, ReviewRow::into_domain)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Review>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .filter(reviews::user_id.eq(*user_id.as_uuid()))
            .order_by(reviews::ordinal)
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_all(rows, ReviewRow::into_domain)
    }

    async fn find_by_user_and_place(
        &self,
        user_id: &UserId,
        place_id: &PlaceId,
    ) -> Result<Option<Review>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .filter(reviews::user_id.eq(*user_id.as_uuid()))
            .filter(reviews::place_id.eq(*place_id.as_uuid()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(ReviewRow::into_domain)
            .transpose()
    }

    async fn update(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<Review, PersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let current = reviews::table
                    .find(*id.as_uuid())
                    .select(ReviewRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or_else(|| not_found::<Review>(id))?
                    .into_domain()?;
                let next = patched(&current, patch, now).map_err(PersistenceError::validation)?;
                diesel::update(reviews::table.find(*id.as_uuid()))
                    .set(ReviewRecord::from(&next))
                    .execute(conn)
                    .await?;
                Ok(next)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(reviews::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if removed == 0 {
            return Err(not_found::<Review>(id));
        }
        Ok(())
    }
}
