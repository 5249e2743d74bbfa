//! Salted password hashing.
//!
//! Digests are `blake3::keyed_hash(key, salt || password)`, where the key is
//! derived from a server-wide pepper. Comparison goes through
//! `blake3::Hash`'s `PartialEq`, which is constant time.

use blake3::Hash;

const KEY_CONTEXT: &str = "tab-backend 2024 password pepper";
pub const SALT_LEN: usize = 16;

/// Stored credential: per-user salt plus digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: Hash,
}

/// Hashes and verifies passwords.
pub trait AuthService: Send + Sync {
    fn hash(&self, password: &str) -> PasswordHash;

    /// Constant-time check of `password` against `stored`.
    fn verify(&self, password: &str, stored: &PasswordHash) -> bool;
}

pub struct Blake3Passwords {
    key: [u8; 32],
}

impl Blake3Passwords {
    pub fn new(pepper: &str) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, pepper.as_bytes()),
        }
    }

    fn digest(&self, salt: &[u8; SALT_LEN], password: &str) -> Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize()
    }

    pub fn hash_with_salt(&self, password: &str, salt: [u8; SALT_LEN]) -> PasswordHash {
        PasswordHash {
            salt,
            digest: self.digest(&salt, password),
        }
    }
}

impl Default for Blake3Passwords {
    fn default() -> Self {
        Self::new("")
    }
}

impl AuthService for Blake3Passwords {
    fn hash(&self, password: &str) -> PasswordHash {
        self.hash_with_salt(password, rand::random())
    }

    fn verify(&self, password: &str, stored: &PasswordHash) -> bool {
        self.digest(&stored.salt, password) == stored.digest
    }
}
