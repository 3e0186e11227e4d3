//! Domain primitives, aggregates and the rental facade.
//!
//! Purpose: keep the listing rules (validation, ownership, referential
//! integrity and the place-amenity join) free of HTTP and storage concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Amenity, Place, Review: validated entities with typed ids.
//! - Actor: the authenticated subject used for every authorization check.
//! - RentalFacade: the application service inbound adapters call.

pub mod access;
pub mod amenity;
pub mod auth;
pub mod entity;
pub mod error;
pub mod facade;
pub mod ids;
pub mod place;
pub mod ports;
pub mod review;
pub mod timestamps;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::access::{Actor, ensure_admin, ensure_owner_or_admin};
pub use self::amenity::{Amenity, AmenityPatch};
pub use self::auth::{LoginCredentials, Password, PasswordDigest};
pub use self::entity::{Entity, Patch};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::facade::{
    AmenityUpdate, FacadePorts, NewAmenity, NewPlace, NewReview, NewUser, PlaceDetails,
    PlaceUpdate, RentalFacade, ReviewUpdate, UserUpdate,
};
pub use self::ids::{AmenityId, IdValidationError, PlaceId, ReviewId, UserId};
pub use self::place::{Place, PlaceDraft, PlacePatch};
pub use self::review::{Review, ReviewPatch};
pub use self::timestamps::Timestamps;
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserPatch};
pub use self::validation::ValidationError;

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use hbnb_backend::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("missing"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
