//! User registration and profile handlers.
//!
//! ```text
//! POST /api/v1/users       {"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","password":"…"}
//! GET  /api/v1/users
//! GET  /api/v1/users/{id}
//! PUT  /api/v1/users/{id}  {"firstName":"Augusta"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, NewUser, Password, User, UserId, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            password: Password::new(value.password)?,
        })
    }
}

/// Profile changes for `PUT /api/v1/users/{id}`. Absent fields stay as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            password: value.password.map(Password::new).transpose()?,
            is_admin: value.is_admin,
        })
    }
}

/// Public view of a user. The password digest never leaves the domain.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            email: user.email().as_str().to_owned(),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Register a new, non-admin user. No session is required.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = NewUser::try_from(payload.into_inner())?;
    let user = state.facade.create_user(new_user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Every registered user.
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.facade.list_users().await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// One user by id.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = UserId::new(path.into_inner())?;
    let user = state.facade.get_user(&user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Update a profile as its owner or an administrator.
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.require_actor()?;
    let user_id = UserId::new(path.into_inner())?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    let user = state.facade.update_user(&actor, &user_id, update).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn blank_passwords_are_rejected_before_the_facade() {
        let request = CreateUserRequest {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password: String::new(),
        };
        let err = NewUser::try_from(request).expect_err("blank password");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn update_keeps_absent_fields_absent() {
        let update = UserUpdate::try_from(UpdateUserRequest {
            last_name: Some("Byron".to_owned()),
            ..UpdateUserRequest::default()
        })
        .expect("valid update");
        assert!(update.first_name.is_none());
        assert!(update.password.is_none());
        assert_eq!(update.last_name.as_deref(), Some("Byron"));
    }

    #[rstest]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<UpdateUserRequest>(r#"{"nickname":"ada"}"#);
        assert!(result.is_err());
    }
}
