//! Translation of Diesel and pool failures into [`PersistenceError`].
//!
//! Constraint names come from the migrations. Unique and foreign-key
//! violations map onto the same constraint and field labels the in-memory
//! adapters report, so the facade sees one vocabulary whichever store runs.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::facade::PLACE_AMENITY;
use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PersistenceError::query(message)
        }
    }
}

fn unique_label(constraint: &str) -> String {
    match constraint {
        "users_email_key" => "users.email".to_owned(),
        "amenities_name_key" => "amenities.name".to_owned(),
        "reviews_user_place_key" => "reviews.user_place".to_owned(),
        "place_amenities_pkey" => PLACE_AMENITY.to_owned(),
        other => other
            .strip_suffix("_pkey")
            .map_or_else(|| other.to_owned(), |table| format!("{table}.id")),
    }
}

fn reference_field(constraint: &str) -> &'static str {
    match constraint {
        "places_owner_id_fkey" => "owner_id",
        "place_amenities_amenity_id_fkey" => "amenities",
        "reviews_user_id_fkey" => "user_id",
        _ => "place_id",
    }
}

pub(crate) fn map_diesel_error(error: DieselError) -> PersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            PersistenceError::duplicate(unique_label(info.constraint_name().unwrap_or_default()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            PersistenceError::missing_reference(reference_field(
                info.constraint_name().unwrap_or_default(),
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::query("database connection error")
        }
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        _ => PersistenceError::query("database error"),
    }
}

/// Lets transaction bodies use `?` on Diesel calls and still return
/// domain-shaped failures.
impl From<DieselError> for PersistenceError {
    fn from(error: DieselError) -> Self {
        map_diesel_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users_email_key", "users.email")]
    #[case("amenities_name_key", "amenities.name")]
    #[case("reviews_user_place_key", "reviews.user_place")]
    #[case("place_amenities_pkey", PLACE_AMENITY)]
    #[case("places_pkey", "places.id")]
    #[case("mystery", "mystery")]
    fn unique_constraints_use_store_labels(#[case] constraint: &str, #[case] label: &str) {
        assert_eq!(unique_label(constraint), label);
    }

    #[rstest]
    #[case("places_owner_id_fkey", "owner_id")]
    #[case("place_amenities_amenity_id_fkey", "amenities")]
    #[case("place_amenities_place_id_fkey", "place_id")]
    #[case("reviews_place_id_fkey", "place_id")]
    #[case("reviews_user_id_fkey", "user_id")]
    fn foreign_keys_name_the_referencing_field(#[case] constraint: &str, #[case] field: &str) {
        assert_eq!(reference_field(constraint), field);
    }

    #[rstest]
    fn missing_rows_are_query_failures() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            PersistenceError::query("database error")
        );
    }

    #[rstest]
    fn pool_failures_keep_their_message() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, PersistenceError::query("timed out"));
    }
}
