//! Start-up provisioning of the administrator account.

mod config;
mod startup;

pub use config::AdminBootstrapSettings;
pub use startup::{AdminBootstrapError, AdminBootstrapOutcome, ensure_admin_account};
