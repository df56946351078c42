//! HMAC-SHA256 signature verification for the identity webhook.
//!
//! The identity provider signs the raw request body with a shared secret
//! and sends the hex digest in `x-webhook-signature`. Verification uses the
//! MAC's constant-time comparison.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a hex-encoded HMAC-SHA256 signature over `body`.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Some(signature) = decode_hex(signature_hex) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Compute the hex signature for a body. Used by tests and tooling to
/// produce valid webhook requests.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).ok())
        .collect()
}
