//! Share-link token generation and hashing.
//!
//! Tokens are opaque 192-bit random strings handed to the client exactly
//! once; only their SHA-256 digest is persisted, so a database leak does not
//! expose live links. Lookups always re-derive the digest from the
//! presented token.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of random bytes in a share token (192 bits).
const TOKEN_BYTES: usize = 24;

/// Generate a new share token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes into the
/// share URL; only the hash may be stored.
pub fn generate_share_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    let token: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_share_token(&token);
    (token, hash)
}

/// Compute the SHA-256 hex digest of a share token.
pub fn hash_share_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
