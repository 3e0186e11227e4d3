//! Place listing handlers, including the place-amenity links and the
//! per-place review collection.
//!
//! ```text
//! POST   /api/v1/places
//! GET    /api/v1/places
//! GET    /api/v1/places/{id}
//! PUT    /api/v1/places/{id}
//! DELETE /api/v1/places/{id}
//! POST   /api/v1/places/{id}/amenities/{amenity_id}
//! DELETE /api/v1/places/{id}/amenities/{amenity_id}
//! GET    /api/v1/places/{id}/reviews
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AmenityId, NewPlace, Place, PlaceDetails, PlaceId, PlaceUpdate, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::amenities::AmenityResponse;
use crate::inbound::http::reviews::ReviewResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Listing body for `POST /api/v1/places`.
///
/// `ownerId` may be omitted; the logged-in user owns the listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePlaceRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub amenities: Vec<AmenityId>,
}

impl From<CreatePlaceRequest> for NewPlace {
    fn from(value: CreatePlaceRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            price: value.price,
            latitude: value.latitude,
            longitude: value.longitude,
            owner_id: value.owner_id,
            amenities: value.amenities,
        }
    }
}

/// Listing changes for `PUT /api/v1/places/{id}`.
///
/// `ownerId` is accepted but ownership never changes. `amenities`, when
/// present, replaces the whole set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePlaceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_id: Option<UserId>,
    pub amenities: Option<Vec<AmenityId>>,
}

impl From<UpdatePlaceRequest> for PlaceUpdate {
    fn from(value: UpdatePlaceRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            price: value.price,
            latitude: value.latitude,
            longitude: value.longitude,
            owner_id: value.owner_id,
            amenities: value.amenities,
        }
    }
}

/// Listing as returned by the place endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: String,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Place> for PlaceResponse {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id().to_string(),
            title: place.title().to_owned(),
            description: place.description().to_owned(),
            price: place.price(),
            latitude: place.latitude(),
            longitude: place.longitude(),
            owner_id: place.owner_id().to_string(),
            amenities: place.amenity_ids().iter().map(ToString::to_string).collect(),
            created_at: place.created_at(),
            updated_at: place.updated_at(),
        }
    }
}

/// Owner summary embedded in place details. Contact details stay private.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Listing with its owner summary and amenity records.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetailsResponse {
    #[serde(flatten)]
    pub place: PlaceResponse,
    pub owner: OwnerSummary,
    pub amenity_details: Vec<AmenityResponse>,
}

impl From<&PlaceDetails> for PlaceDetailsResponse {
    fn from(details: &PlaceDetails) -> Self {
        Self {
            place: PlaceResponse::from(&details.place),
            owner: OwnerSummary {
                id: details.owner.id().to_string(),
                first_name: details.owner.first_name().to_owned(),
                last_name: details.owner.last_name().to_owned(),
            },
            amenity_details: details.amenities.iter().map(AmenityResponse::from).collect(),
        }
    }
}

/// Create a listing owned by the session user.
#[post("/places")]
pub async fn create_place(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePlaceRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let place = state
        .facade
        .create_place(&actor, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(PlaceResponse::from(&place)))
}

/// Every listing.
#[get("/places")]
pub async fn list_places(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PlaceResponse>>> {
    let places = state.facade.list_places().await?;
    Ok(web::Json(places.iter().map(PlaceResponse::from).collect()))
}

/// A place with its owner and amenities resolved.
#[get("/places/{id}")]
pub async fn get_place(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaceDetailsResponse>> {
    let place_id = PlaceId::new(path.into_inner())?;
    let details = state.facade.get_place_details(&place_id).await?;
    Ok(web::Json(PlaceDetailsResponse::from(&details)))
}

/// Edit a listing as its owner or an administrator.
#[put("/places/{id}")]
pub async fn update_place(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdatePlaceRequest>,
) -> ApiResult<web::Json<PlaceResponse>> {
    let actor = session.require_actor()?;
    let place_id = PlaceId::new(path.into_inner())?;
    let place = state
        .facade
        .update_place(&actor, &place_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(PlaceResponse::from(&place)))
}

/// Delete a place together with its reviews.
#[delete("/places/{id}")]
pub async fn delete_place(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let place_id = PlaceId::new(path.into_inner())?;
    state.facade.delete_place(&actor, &place_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn link_ids(path: web::Path<(String, String)>) -> ApiResult<(PlaceId, AmenityId)> {
    let (place_id, amenity_id) = path.into_inner();
    Ok((PlaceId::new(place_id)?, AmenityId::new(amenity_id)?))
}

/// Link an amenity to a listing.
#[post("/places/{id}/amenities/{amenity_id}")]
pub async fn add_place_amenity(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PlaceResponse>> {
    let actor = session.require_actor()?;
    let (place_id, amenity_id) = link_ids(path)?;
    let place = state
        .facade
        .add_amenity_to_place(&actor, &place_id, &amenity_id)
        .await?;
    Ok(web::Json(PlaceResponse::from(&place)))
}

/// Unlink an amenity from a listing.
#[delete("/places/{id}/amenities/{amenity_id}")]
pub async fn remove_place_amenity(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PlaceResponse>> {
    let actor = session.require_actor()?;
    let (place_id, amenity_id) = link_ids(path)?;
    let place = state
        .facade
        .remove_amenity_from_place(&actor, &place_id, &amenity_id)
        .await?;
    Ok(web::Json(PlaceResponse::from(&place)))
}

/// Reviews of one place, oldest first.
#[get("/places/{id}/reviews")]
pub async fn list_place_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let place_id = PlaceId::new(path.into_inner())?;
    let reviews = state.facade.get_reviews_by_place(&place_id).await?;
    Ok(web::Json(reviews.iter().map(ReviewResponse::from).collect()))
}
