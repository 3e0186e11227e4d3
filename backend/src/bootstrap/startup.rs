//! Start-up orchestration for the administrator account.

use thiserror::Error;
use tracing::info;

use crate::bootstrap::config::AdminBootstrapSettings;
use crate::domain::{
    Actor, Error as DomainError, ErrorCode, NewUser, Password, RentalFacade, User, UserUpdate,
};

/// What start-up provisioning did to the admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrapOutcome {
    /// No account existed; one was registered and promoted.
    Created,
    /// A regular account with the admin email was promoted.
    Promoted,
    /// The account already held admin rights.
    AlreadyAdmin,
}

/// Errors returned while ensuring the admin account.
#[derive(Debug, Error)]
pub enum AdminBootstrapError {
    /// The account must be created but no initial password is configured.
    #[error("admin account {email} does not exist and ADMIN_BOOTSTRAP_PASSWORD is unset")]
    MissingPassword { email: String },
    /// A facade operation failed.
    #[error("admin bootstrap failed: {0}")]
    Facade(#[from] DomainError),
}

/// Make sure the configured admin account exists and holds admin rights.
///
/// Safe to run on every start: an account that is already an administrator
/// is left untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use hbnb_backend::bootstrap::{AdminBootstrapSettings, ensure_admin_account};
/// use hbnb_backend::domain::RentalFacade;
///
/// # async fn run(facade: RentalFacade) -> Result<(), Box<dyn std::error::Error>> {
/// let settings = AdminBootstrapSettings {
///     enabled: false,
///     email: None,
///     password: None,
///     first_name: None,
///     last_name: None,
/// };
/// let outcome = ensure_admin_account(&facade, &settings).await?;
/// assert!(outcome.is_none());
/// # Ok(())
/// # }
/// ```
pub async fn ensure_admin_account(
    facade: &RentalFacade,
    settings: &AdminBootstrapSettings,
) -> Result<Option<AdminBootstrapOutcome>, AdminBootstrapError> {
    if !settings.enabled {
        info!(reason = "disabled", "admin bootstrap skipped");
        return Ok(None);
    }

    let email = settings.email();
    let (user, outcome) = match find_by_email(facade, email).await? {
        Some(user) if user.is_admin() => {
            info!(user_id = %user.id(), "admin account already provisioned");
            return Ok(Some(AdminBootstrapOutcome::AlreadyAdmin));
        }
        Some(user) => (user, AdminBootstrapOutcome::Promoted),
        None => {
            let password = settings.password.as_deref().ok_or_else(|| {
                AdminBootstrapError::MissingPassword {
                    email: email.to_owned(),
                }
            })?;
            let user = facade
                .create_user(NewUser {
                    first_name: settings.first_name().to_owned(),
                    last_name: settings.last_name().to_owned(),
                    email: email.to_owned(),
                    password: Password::new(password).map_err(DomainError::from)?,
                })
                .await?;
            (user, AdminBootstrapOutcome::Created)
        }
    };

    let promotion = UserUpdate {
        is_admin: Some(true),
        ..UserUpdate::default()
    };
    let admin = facade
        .update_user(&Actor::system(), user.id(), promotion)
        .await?;
    info!(user_id = %admin.id(), outcome = ?outcome, "admin account provisioned");
    Ok(Some(outcome))
}

async fn find_by_email(facade: &RentalFacade, email: &str) -> Result<Option<User>, DomainError> {
    match facade.get_user_by_email(email).await {
        Ok(user) => Ok(Some(user)),
        Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoginCredentials;
    use crate::domain::ports::LoginService;
    use crate::test_support::memory_facade;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> AdminBootstrapSettings {
        AdminBootstrapSettings {
            enabled: true,
            email: Some("admin@hbnb.io".to_owned()),
            password: Some("admin1234".to_owned()),
            first_name: None,
            last_name: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn creates_admin_that_can_log_in(settings: AdminBootstrapSettings) {
        let (facade, _clock) = memory_facade();

        let outcome = ensure_admin_account(&facade, &settings)
            .await
            .expect("bootstrap succeeds");

        assert_eq!(outcome, Some(AdminBootstrapOutcome::Created));
        let admin = facade
            .get_user_by_email("admin@hbnb.io")
            .await
            .expect("admin stored");
        assert!(admin.is_admin());
        assert_eq!(admin.first_name(), "Admin");
        let credentials =
            LoginCredentials::try_from_parts("admin@hbnb.io", "admin1234").expect("valid input");
        let actor = facade
            .authenticate(&credentials)
            .await
            .expect("admin can log in");
        assert!(actor.is_admin());
    }

    #[rstest]
    #[tokio::test]
    async fn second_run_is_a_no_op(settings: AdminBootstrapSettings) {
        let (facade, _clock) = memory_facade();
        ensure_admin_account(&facade, &settings)
            .await
            .expect("first run succeeds");

        let outcome = ensure_admin_account(&facade, &settings)
            .await
            .expect("second run succeeds");

        assert_eq!(outcome, Some(AdminBootstrapOutcome::AlreadyAdmin));
        assert_eq!(facade.list_users().await.expect("list users").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn promotes_existing_regular_account(settings: AdminBootstrapSettings) {
        let (facade, _clock) = memory_facade();
        let existing = facade
            .create_user(NewUser {
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                email: "admin@hbnb.io".to_owned(),
                password: Password::new("engine42").expect("valid password"),
            })
            .await
            .expect("user registered");

        let outcome = ensure_admin_account(&facade, &settings)
            .await
            .expect("bootstrap succeeds");

        assert_eq!(outcome, Some(AdminBootstrapOutcome::Promoted));
        let promoted = facade.get_user(existing.id()).await.expect("user stored");
        assert!(promoted.is_admin());
        assert_eq!(promoted.first_name(), "Ada");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_password_is_reported(mut settings: AdminBootstrapSettings) {
        let (facade, _clock) = memory_facade();
        settings.password = None;

        let err = ensure_admin_account(&facade, &settings)
            .await
            .expect_err("password required");

        assert!(matches!(err, AdminBootstrapError::MissingPassword { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_bootstrap_skips(mut settings: AdminBootstrapSettings) {
        let (facade, _clock) = memory_facade();
        settings.enabled = false;

        let outcome = ensure_admin_account(&facade, &settings)
            .await
            .expect("skip succeeds");

        assert_eq!(outcome, None);
        assert!(facade.list_users().await.expect("list users").is_empty());
    }
}
