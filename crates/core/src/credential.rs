//! Password hashing for the upstream login.

use std::fmt;

use sha2::{Digest, Sha512};

/// Upstream-ready password hash: uppercase hex SHA-512 of the raw secret.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedCredential(String);

impl HashedCredential {
    /// Hex digest as sent in the `passwordHash` field.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedCredential(<redacted>)")
    }
}

/// Derives the hashed credential from a raw shared secret.
pub fn derive(raw_secret: &str) -> HashedCredential {
    let mut hasher = Sha512::new();
    hasher.update(raw_secret.as_bytes());
    HashedCredential(hex::encode_upper(hasher.finalize()))
}
