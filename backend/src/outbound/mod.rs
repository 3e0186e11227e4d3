//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: in-memory and PostgreSQL repositories for users,
//!   amenities, places and reviews
//! - **password_hasher**: bcrypt digests for stored credentials
//!
//! Adapters translate between storage representations and domain types.
//! They contain no business rules.

pub mod password_hasher;
pub mod persistence;

pub use password_hasher::BcryptPasswordHasher;
