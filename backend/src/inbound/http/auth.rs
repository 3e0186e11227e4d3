//! Login, logout and current-subject handlers.
//!
//! ```text
//! POST /api/v1/auth/login   {"email":"ada@example.com","password":"…"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Actor, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Subject established by a successful login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Logged-in user.
    pub user_id: String,
    /// Whether the user is an administrator.
    pub is_admin: bool,
}

impl From<&Actor> for SessionResponse {
    fn from(actor: &Actor) -> Self {
        Self {
            user_id: actor.id().to_string(),
            is_admin: actor.is_admin(),
        }
    }
}

/// Authenticate and establish a session cookie.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)?;
    let actor = state.login.authenticate(&credentials).await?;
    session.persist_actor(&actor)?;
    info!(user_id = %actor.id(), "session established");
    Ok(web::Json(SessionResponse::from(&actor)))
}

/// Drop the session cookie. Always `204`.
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Profile of the logged-in user.
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.require_actor()?;
    let user = state.facade.get_user(actor.id()).await?;
    Ok(web::Json(UserResponse::from(&user)))
}
