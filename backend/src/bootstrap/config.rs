//! Admin bootstrap configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_EMAIL: &str = "admin@hbnb.io";
const DEFAULT_FIRST_NAME: &str = "Admin";
const DEFAULT_LAST_NAME: &str = "User";

/// Settings controlling the administrator account ensured at start-up.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN_BOOTSTRAP")]
pub struct AdminBootstrapSettings {
    /// Ensure the admin account on start-up.
    #[ortho_config(default = true)]
    pub enabled: bool,
    /// Well-known admin email.
    pub email: Option<String>,
    /// Initial password. Only needed when the account does not exist yet.
    pub password: Option<String>,
    /// Given name for a newly created admin.
    pub first_name: Option<String>,
    /// Family name for a newly created admin.
    pub last_name: Option<String>,
}

impl AdminBootstrapSettings {
    /// Configured email or the built-in default.
    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or(DEFAULT_EMAIL)
    }

    /// Configured first name or the default.
    pub fn first_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or(DEFAULT_FIRST_NAME)
    }

    /// Configured last name or the default.
    pub fn last_name(&self) -> &str {
        self.last_name.as_deref().unwrap_or(DEFAULT_LAST_NAME)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for admin bootstrap configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AdminBootstrapSettings {
        AdminBootstrapSettings::load_from_iter([OsString::from("hbnb-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("ADMIN_BOOTSTRAP_ENABLED", None::<String>),
            ("ADMIN_BOOTSTRAP_EMAIL", None::<String>),
            ("ADMIN_BOOTSTRAP_PASSWORD", None::<String>),
            ("ADMIN_BOOTSTRAP_FIRST_NAME", None::<String>),
            ("ADMIN_BOOTSTRAP_LAST_NAME", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.enabled);
        assert_eq!(settings.email(), DEFAULT_EMAIL);
        assert_eq!(settings.first_name(), DEFAULT_FIRST_NAME);
        assert_eq!(settings.last_name(), DEFAULT_LAST_NAME);
        assert!(settings.password.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ADMIN_BOOTSTRAP_ENABLED", Some("false".to_owned())),
            ("ADMIN_BOOTSTRAP_EMAIL", Some("root@example.com".to_owned())),
            ("ADMIN_BOOTSTRAP_PASSWORD", Some("hunter2".to_owned())),
            ("ADMIN_BOOTSTRAP_FIRST_NAME", Some("Root".to_owned())),
            ("ADMIN_BOOTSTRAP_LAST_NAME", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.enabled);
        assert_eq!(settings.email(), "root@example.com");
        assert_eq!(settings.password.as_deref(), Some("hunter2"));
        assert_eq!(settings.first_name(), "Root");
        assert_eq!(settings.last_name(), DEFAULT_LAST_NAME);
    }
}
