//! Strongly typed entity identifiers.
//!
//! Every entity is addressed by a UUID-v4 string. Each kind gets its own
//! newtype so a place id can never be passed where a user id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::Error;

/// Validation errors returned when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    #[error("{entity} id must not be empty")]
    Empty { entity: &'static str },
    #[error("{entity} id must be a valid UUID")]
    Invalid { entity: &'static str },
}

impl From<IdValidationError> for Error {
    fn from(err: IdValidationError) -> Self {
        let entity = match &err {
            IdValidationError::Empty { entity } | IdValidationError::Invalid { entity } => *entity,
        };
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": format!("{entity}_id"),
            "code": "invalid_id",
        }))
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident => $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid, String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                Self::from_owned(id.as_ref().to_owned())
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self::from_uuid(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid, uuid.to_string())
            }

            fn from_owned(id: String) -> Result<Self, IdValidationError> {
                if id.is_empty() {
                    return Err(IdValidationError::Empty { entity: $entity });
                }
                if id.trim() != id {
                    return Err(IdValidationError::Invalid { entity: $entity });
                }
                let parsed = Uuid::parse_str(&id)
                    .map_err(|_| IdValidationError::Invalid { entity: $entity })?;
                Ok(Self(parsed, id))
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.1.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.1
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }
    };
}

define_entity_id!(
    /// Stable user identifier.
    UserId => "user"
);
define_entity_id!(
    /// Stable place identifier.
    PlaceId => "place"
);
define_entity_id!(
    /// Stable amenity identifier.
    AmenityId => "amenity"
);
define_entity_id!(
    /// Stable review identifier.
    ReviewId => "review"
);
