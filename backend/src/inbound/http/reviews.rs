//! Review handlers.
//!
//! ```text
//! POST   /api/v1/reviews       {"text":"Great stay","rating":5,"placeId":"…"}
//! GET    /api/v1/reviews
//! GET    /api/v1/reviews/{id}
//! PUT    /api/v1/reviews/{id}  {"rating":4}
//! DELETE /api/v1/reviews/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NewReview, PlaceId, Review, ReviewId, ReviewUpdate, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Review body for `POST /api/v1/reviews`. The author is the session user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateReviewRequest {
    pub text: String,
    pub rating: i64,
    pub place_id: PlaceId,
}

/// Review changes for `PUT /api/v1/reviews/{id}`.
///
/// `placeId` and `userId` may only repeat the stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub rating: Option<i64>,
    pub place_id: Option<PlaceId>,
    pub user_id: Option<UserId>,
}

/// Review as returned by every review endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub text: String,
    pub rating: u8,
    pub place_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            text: review.text().to_owned(),
            rating: review.rating(),
            place_id: review.place_id().to_string(),
            user_id: review.user_id().to_string(),
            created_at: review.created_at(),
            updated_at: review.updated_at(),
        }
    }
}

/// Review a place as the session user. Owners cannot review their own listing.
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let CreateReviewRequest {
        text,
        rating,
        place_id,
    } = payload.into_inner();
    let review = state
        .facade
        .create_review(
            &actor,
            NewReview {
                text,
                rating,
                place_id,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(&review)))
}

/// Every review.
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let reviews = state.facade.list_reviews().await?;
    Ok(web::Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// One review by id.
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let review_id = ReviewId::new(path.into_inner())?;
    let review = state.facade.get_review(&review_id).await?;
    Ok(web::Json(ReviewResponse::from(&review)))
}

/// Edit a review as its author or an administrator.
#[put("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateReviewRequest>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let actor = session.require_actor()?;
    let review_id = ReviewId::new(path.into_inner())?;
    let UpdateReviewRequest {
        text,
        rating,
        place_id,
        user_id,
    } = payload.into_inner();
    let update = ReviewUpdate {
        text,
        rating,
        place_id,
        user_id,
    };
    let review = state
        .facade
        .update_review(&actor, &review_id, update)
        .await?;
    Ok(web::Json(ReviewResponse::from(&review)))
}

/// Delete a review as its author or an administrator.
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let review_id = ReviewId::new(path.into_inner())?;
    state.facade.delete_review(&actor, &review_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"text":"ok","rating":4.5,"placeId":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}"#)]
    #[case(r#"{"text":"ok","rating":4,"placeId":"3fa85f64-5717-4562-b3fc-2c963f66afa6","userId":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}"#)]
    #[case(r#"{"text":"ok","rating":4}"#)]
    fn malformed_review_bodies_fail_to_parse(#[case] body: &str) {
        assert!(serde_json::from_str::<CreateReviewRequest>(body).is_err());
    }
}
