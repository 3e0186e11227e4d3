//! Amenities that places may offer.

use chrono::{DateTime, Utc};

use super::entity::{Entity, Patch};
use super::validation::{ValidationError, validate_string_length};
use super::{AmenityId, Timestamps};

/// Maximum amenity name length.
pub const AMENITY_NAME_MAX: usize = 50;

/// Named facility such as "Wi-Fi". Names are unique across the catalogue;
/// the repository enforces that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amenity {
    id: AmenityId,
    name: String,
    timestamps: Timestamps,
}

impl Amenity {
    /// Build an amenity, validating its name.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: AmenityId::random(),
            name,
            timestamps: Timestamps::new(now),
        })
    }

    /// Rebuild a stored amenity, re-checking its name.
    pub fn restore(
        id: AmenityId,
        name: impl Into<String>,
        timestamps: Timestamps,
    ) -> Result<Self, ValidationError> {
        let mut amenity = Self::new(name, timestamps.created_at())?;
        amenity.id = id;
        amenity.timestamps = timestamps;
        Ok(amenity)
    }

    /// Stable identifier.
    pub fn id(&self) -> &AmenityId {
        &self.id
    }

    /// Display name, unique across the catalogue.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    /// Latest modification instant.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// Rename the amenity, validating length.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_string_length(name, "name", AMENITY_NAME_MAX, true)
}

impl Entity for Amenity {
    type Id = AmenityId;
    const KIND: &'static str = "amenity";

    fn entity_id(&self) -> &AmenityId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamps.touch(now);
    }
}

/// Stored-field changes for an amenity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmenityPatch {
    /// Replacement name.
    pub name: Option<String>,
}

impl Patch<Amenity> for AmenityPatch {
    fn apply_to(&self, amenity: &mut Amenity) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            amenity.set_name(name.as_str())?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("  ", false)]
    #[case("Wi-Fi", true)]
    #[case("12345678901234567890123456789012345678901234567890", true)]
    #[case("123456789012345678901234567890123456789012345678901", false)]
    fn name_rules(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(Amenity::new(name, Utc::now()).is_ok(), valid);
    }

    #[rstest]
    fn set_name_keeps_previous_value_on_failure() {
        let mut amenity = Amenity::new("Pool", Utc::now()).expect("valid amenity");
        assert!(amenity.set_name("").is_err());
        assert_eq!(amenity.name(), "Pool");
    }
}
