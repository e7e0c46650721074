//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "failed to hash password: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Produces and checks password hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Reversible marker scheme for tests and local runs without real accounts.
///
/// Never use outside tests: hashes are the password with a prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{FIXTURE_PREFIX}{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let stored = hash
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing fixture prefix"))?;
        Ok(stored == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixture_hasher_round_trips() {
        let hasher = FixturePasswordHasher;
        let hash = hasher.hash("secret").expect("hash succeeds");
        assert!(hasher.verify("secret", &hash).expect("verify succeeds"));
        assert!(!hasher.verify("other", &hash).expect("verify succeeds"));
    }

    #[rstest]
    fn fixture_hasher_rejects_foreign_hashes() {
        let err = FixturePasswordHasher
            .verify("secret", "$argon2id$v=19$...")
            .expect_err("foreign hash");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}
