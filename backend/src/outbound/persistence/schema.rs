//! Diesel table definitions for the rental schema.
//!
//! These must match `migrations/` exactly. `ordinal` columns are identity
//! columns used only for ordering and are never written by the adapters.

diesel::table! {
    /// Registered users. `email` is unique.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        is_admin -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        ordinal -> Int8,
    }
}

diesel::table! {
    /// Amenity catalogue. `name` is unique.
    amenities (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        ordinal -> Int8,
    }
}

diesel::table! {
    /// Listings. `owner_id` cascades from `users`.
    places (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        price -> Float8,
        latitude -> Float8,
        longitude -> Float8,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        ordinal -> Int8,
    }
}

diesel::table! {
    /// Place-amenity join; both sides cascade.
    place_amenities (place_id, amenity_id) {
        place_id -> Uuid,
        amenity_id -> Uuid,
    }
}

diesel::table! {
    /// Reviews. One per `(user_id, place_id)`; both references cascade.
    reviews (id) {
        id -> Uuid,
        text -> Text,
        rating -> Int2,
        place_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        ordinal -> Int8,
    }
}

diesel::joinable!(places -> users (owner_id));
diesel::joinable!(place_amenities -> places (place_id));
diesel::joinable!(place_amenities -> amenities (amenity_id));
diesel::joinable!(reviews -> places (place_id));

diesel::allow_tables_to_appear_in_same_query!(users, amenities, places, place_amenities, reviews);
