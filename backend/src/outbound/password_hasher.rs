//! bcrypt password hasher.
//!
//! Digests use the modular crypt format (`$2b$<cost>$<salt+hash>`), so the
//! cost factor travels with every stored digest and can be raised later
//! without invalidating existing accounts.

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

/// Lowest cost factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// [`PasswordHasher`] backed by the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Build a hasher, clamping `cost` into bcrypt's accepted range.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    /// Work factor applied to new digests.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        bcrypt::hash(password.expose(), self.cost)
            .map(PasswordDigest::from_encoded)
            .map_err(|err| PasswordHashError::unavailable(err.to_string()))
    }

    fn verify(&self, password: &Password, digest: &PasswordDigest) -> bool {
        bcrypt::verify(password.expose(), digest.encoded()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(MIN_COST)
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[rstest]
    fn verifies_the_original_password(hasher: BcryptPasswordHasher) {
        let digest = hasher.hash(&password("correct horse")).expect("hash");
        assert!(hasher.verify(&password("correct horse"), &digest));
        assert!(!hasher.verify(&password("battery staple"), &digest));
    }

    #[rstest]
    fn salts_every_digest(hasher: BcryptPasswordHasher) {
        let first = hasher.hash(&password("same")).expect("hash");
        let second = hasher.hash(&password("same")).expect("hash");
        assert_ne!(first.encoded(), second.encoded());
        assert!(!first.encoded().contains("same"));
    }

    #[rstest]
    fn digests_carry_their_cost(hasher: BcryptPasswordHasher) {
        let digest = hasher.hash(&password("pw")).expect("hash");
        assert!(digest.encoded().starts_with("$2b$04$"));
        let stronger = BcryptPasswordHasher::new(MIN_COST + 1);
        assert!(stronger.verify(&password("pw"), &digest));
    }

    #[rstest]
    #[case(0, MIN_COST)]
    #[case(12, 12)]
    #[case(99, MAX_COST)]
    fn cost_is_clamped(#[case] requested: u32, #[case] expected: u32) {
        assert_eq!(BcryptPasswordHasher::new(requested).cost(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("plaintext")]
    #[case("$2b$04$tooshort")]
    #[case("sha256$1$aa$bb")]
    fn malformed_digests_never_verify(hasher: BcryptPasswordHasher, #[case] encoded: &str) {
        let digest = PasswordDigest::from_encoded(encoded);
        assert!(!hasher.verify(&password("anything"), &digest));
    }
}
