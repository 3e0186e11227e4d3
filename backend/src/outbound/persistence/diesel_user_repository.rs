//! PostgreSQL-backed `UserRepository`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use mockable::Clock;

use crate::domain::entity::patched;
use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{User, UserId, UserPatch};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{UserRecord, UserRow, into_domain_all};
use super::not_found;
use super::pool::DbPool;
use super::schema::users;

/// Diesel adapter for users. Email uniqueness is the `users_email_key`
/// constraint; deletes cascade to the user's places and reviews.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    /// Repository over `pool`, stamping updates with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn add(&self, user: &User) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRecord::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(UserRow::into_domain)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<User>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .order_by(users::ordinal)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_domain_all(rows, UserRow::into_domain)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(UserRow::into_domain)
            .transpose()
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, PersistenceError> {
        let now = self.clock.utc();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let current = users::table
                    .find(*id.as_uuid())
                    .select(UserRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or_else(|| not_found::<User>(id))?
                    .into_domain()?;
                let next = patched(&current, patch, now).map_err(PersistenceError::validation)?;
                diesel::update(users::table.find(*id.as_uuid()))
                    .set(UserRecord::from(&next))
                    .execute(conn)
                    .await?;
                Ok(next)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete(&self, id: &UserId) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if removed == 0 {
            return Err(not_found::<User>(id));
        }
        Ok(())
    }
}
