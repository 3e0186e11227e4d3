//! Amenity catalogue handlers. Writes require an administrator session.
//!
//! ```text
//! POST /api/v1/amenities       {"name":"Wi-Fi"}
//! GET  /api/v1/amenities
//! GET  /api/v1/amenities/{id}
//! PUT  /api/v1/amenities/{id}  {"name":"Fast Wi-Fi"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amenity, AmenityId, AmenityUpdate, NewAmenity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/amenities`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAmenityRequest {
    pub name: String,
}

/// Body for `PUT /api/v1/amenities/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAmenityRequest {
    pub name: Option<String>,
}

/// Amenity as returned by the catalogue endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Amenity> for AmenityResponse {
    fn from(amenity: &Amenity) -> Self {
        Self {
            id: amenity.id().to_string(),
            name: amenity.name().to_owned(),
            created_at: amenity.created_at(),
            updated_at: amenity.updated_at(),
        }
    }
}

/// Add an amenity. Administrators only.
#[post("/amenities")]
pub async fn create_amenity(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAmenityRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let CreateAmenityRequest { name } = payload.into_inner();
    let amenity = state
        .facade
        .create_amenity(&actor, NewAmenity { name })
        .await?;
    Ok(HttpResponse::Created().json(AmenityResponse::from(&amenity)))
}

/// The whole catalogue.
#[get("/amenities")]
pub async fn list_amenities(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AmenityResponse>>> {
    let amenities = state.facade.list_amenities().await?;
    Ok(web::Json(amenities.iter().map(AmenityResponse::from).collect()))
}

/// One amenity by id.
#[get("/amenities/{id}")]
pub async fn get_amenity(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AmenityResponse>> {
    let amenity_id = AmenityId::new(path.into_inner())?;
    let amenity = state.facade.get_amenity(&amenity_id).await?;
    Ok(web::Json(AmenityResponse::from(&amenity)))
}

/// Rename an amenity. Administrators only.
#[put("/amenities/{id}")]
pub async fn update_amenity(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateAmenityRequest>,
) -> ApiResult<web::Json<AmenityResponse>> {
    let actor = session.require_actor()?;
    let amenity_id = AmenityId::new(path.into_inner())?;
    let update = AmenityUpdate {
        name: payload.into_inner().name,
    };
    let amenity = state
        .facade
        .update_amenity(&actor, &amenity_id, update)
        .await?;
    Ok(web::Json(AmenityResponse::from(&amenity)))
}
