//! User registration, profile updates and authentication.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{RentalFacade, hash_failure, persistence_failure};
use crate::domain::ports::LoginService;
use crate::domain::{
    Actor, Error, LoginCredentials, Password, PasswordDigest, Patch, User, UserId, UserPatch,
    ensure_owner_or_admin,
};

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Required, at most 50 characters.
    pub first_name: String,
    /// Required, at most 50 characters.
    pub last_name: String,
    /// Must be unique across users.
    pub email: String,
    /// Plaintext; only its digest is stored.
    pub password: Password,
}

/// Caller-supplied profile changes. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// Administrators only.
    pub email: Option<String>,
    /// Administrators only; rehashed before storing.
    pub password: Option<Password>,
    /// Administrators only.
    pub is_admin: Option<bool>,
}

impl RentalFacade {
    /// Register a regular user.
    ///
    /// Fails with `Conflict` when the email is already registered and with
    /// `InvalidRequest` when a field is malformed.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        let NewUser {
            first_name,
            last_name,
            email,
            password,
        } = new_user;

        self.ensure_email_available(&email, None).await?;

        let mut user = User::new(
            first_name,
            last_name,
            email,
            PasswordDigest::from_encoded(String::new()),
            self.now(),
        )?;
        user.set_password(self.passwords.as_ref(), &password)
            .map_err(hash_failure)?;

        self.users.add(&user).await.map_err(persistence_failure)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Update a profile on behalf of `actor`.
    ///
    /// Regular users may only rename themselves. Email, password and admin
    /// status are reserved for administrators.
    pub async fn update_user(
        &self,
        actor: &Actor,
        user_id: &UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        let target = self.get_user(user_id).await?;
        ensure_owner_or_admin(actor, target.id(), "update user")?;

        if !actor.is_admin() {
            if update.is_admin.is_some() {
                debug!(actor = %actor.id(), "non-admin attempted to change admin status");
                return Err(Error::forbidden("only administrators may change admin status"));
            }
            if update.email.is_some() || update.password.is_some() {
                return Err(Error::invalid_request(
                    "you cannot modify email or password",
                ));
            }
        }

        if let Some(email) = update
            .email
            .as_deref()
            .filter(|email| *email != target.email().as_str())
        {
            self.ensure_email_available(email, Some(target.id())).await?;
        }

        let password_digest = update
            .password
            .as_ref()
            .map(|password| self.passwords.hash(password))
            .transpose()
            .map_err(hash_failure)?;

        let patch = UserPatch {
            first_name: update.first_name,
            last_name: update.last_name,
            email: update.email,
            password_digest,
            is_admin: update.is_admin,
        };
        if patch.is_empty() {
            return Ok(target);
        }

        let user = self
            .users
            .update(target.id(), &patch)
            .await
            .map_err(persistence_failure)?;
        info!(user_id = %user.id(), actor = %actor.id(), "user updated");
        Ok(user)
    }

    /// Fetch one user. Unknown ids are `NotFound`.
    pub async fn get_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .get(user_id)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    /// Fetch the user registered under `email`.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(persistence_failure)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Every user in registration order.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.get_all().await.map_err(persistence_failure)
    }

    async fn ensure_email_available(
        &self,
        email: &str,
        exclude: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_email(email)
            .await
            .map_err(persistence_failure)?;
        match existing {
            Some(user) if Some(user.id()) != exclude => {
                debug!(user_id = %user.id(), "email already registered");
                Err(Error::conflict("email already registered"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl LoginService for RentalFacade {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(persistence_failure)?;
        match user {
            Some(user) if user.verify_password(self.passwords.as_ref(), credentials.password()) => {
                info!(user_id = %user.id(), "user authenticated");
                Ok(Actor::new(user.id().clone(), user.is_admin()))
            }
            _ => {
                debug!("authentication rejected");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}
