//! Role and ownership rules applied uniformly across resources.
//!
//! Authorization inputs are always the acting subject: its id and admin
//! claim. Ownership fields supplied by callers are never trusted.

use tracing::debug;
use uuid::Uuid;

use super::{Error, UserId};

/// Authenticated subject performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    is_admin: bool,
}

impl Actor {
    /// Actor for a logged-in user.
    pub fn new(id: UserId, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    /// Internal administrator used by start-up provisioning.
    ///
    /// Its id is the nil UUID, which never belongs to a stored user.
    pub fn system() -> Self {
        Self::new(UserId::from_uuid(Uuid::nil()), true)
    }

    /// User the request acts as.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Whether administrator rules apply.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether the actor is the subject identified by `user_id`.
    pub fn is(&self, user_id: &UserId) -> bool {
        &self.id == user_id
    }
}

/// Require an admin actor.
pub fn ensure_admin(actor: &Actor, action: &str) -> Result<(), Error> {
    if actor.is_admin() {
        return Ok(());
    }
    debug!(actor = %actor.id(), action, "admin privileges required");
    Err(Error::forbidden(format!("admin privileges required to {action}")))
}

/// Require the actor to own the resource or be an admin.
pub fn ensure_owner_or_admin(actor: &Actor, owner: &UserId, action: &str) -> Result<(), Error> {
    if actor.is_admin() || actor.is(owner) {
        return Ok(());
    }
    debug!(actor = %actor.id(), owner = %owner, action, "ownership check failed");
    Err(Error::forbidden(format!("unauthorized action: {action}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(false, true, true)]
    #[case(true, false, true)]
    #[case(false, false, false)]
    fn owner_or_admin(#[case] is_admin: bool, #[case] owns: bool, #[case] allowed: bool) {
        let owner = UserId::random();
        let actor_id = if owns { owner.clone() } else { UserId::random() };
        let actor = Actor::new(actor_id, is_admin);

        let result = ensure_owner_or_admin(&actor, &owner, "update place");

        assert_eq!(result.is_ok(), allowed);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }

    #[rstest]
    fn admin_gate_rejects_regular_users() {
        let err = ensure_admin(&Actor::new(UserId::random(), false), "create amenities")
            .expect_err("regular user rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn system_actor_is_admin() {
        let system = Actor::system();
        assert!(system.is_admin());
        assert_eq!(system.id().as_uuid(), &Uuid::nil());
    }
}
