//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend only on the
//! facade and the login port, never on concrete adapters.

use std::sync::Arc;

use crate::domain::RentalFacade;
use crate::domain::ports::LoginService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Every listing use case.
    pub facade: Arc<RentalFacade>,
    /// Credential check behind `/auth/login`.
    pub login: Arc<dyn LoginService>,
}

impl HttpState {
    /// Build state whose login port is the facade itself.
    pub fn new(facade: Arc<RentalFacade>) -> Self {
        let login: Arc<dyn LoginService> = facade.clone();
        Self { facade, login }
    }

    /// Replace the login port, e.g. with a test double.
    #[must_use]
    pub fn with_login(mut self, login: Arc<dyn LoginService>) -> Self {
        self.login = login;
        self
    }
}
