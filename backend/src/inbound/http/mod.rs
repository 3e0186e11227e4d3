//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod amenities;
pub mod auth;
pub mod error;
pub mod places;
pub mod reviews;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Base path of every REST endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Register every handler under [`API_PREFIX`] together with the JSON
/// extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use hbnb_backend::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config()).service(
        web::scope(API_PREFIX)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me)
            .service(users::create_user)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(amenities::create_amenity)
            .service(amenities::list_amenities)
            .service(amenities::get_amenity)
            .service(amenities::update_amenity)
            .service(places::create_place)
            .service(places::list_places)
            .service(places::get_place)
            .service(places::update_place)
            .service(places::delete_place)
            .service(places::add_place_amenity)
            .service(places::remove_place_amenity)
            .service(places::list_place_reviews)
            .service(reviews::create_review)
            .service(reviews::list_reviews)
            .service(reviews::get_review)
            .service(reviews::update_review)
            .service(reviews::delete_review),
    );
}
