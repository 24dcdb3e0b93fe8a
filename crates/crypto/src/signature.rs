use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Maximum distance in seconds between a request timestamp and the server clock
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature is not valid hex: {0}")]
    BadEncoding(#[from] hex::FromHexError),
    #[error("timestamp is not a decimal integer: {0}")]
    BadTimestamp(#[from] std::num::ParseIntError),
    #[error("secret is not usable as an HMAC key")]
    InvalidKey,
}

fn keyed_mac(secret: &[u8]) -> Result<HmacSha1, SignatureError> {
    <HmacSha1 as Mac>::new_from_slice(secret).map_err(|_| SignatureError::InvalidKey)
}

/// Compute HMAC-SHA1 of `message` keyed with `secret`
pub fn sign_message(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, SignatureError> {
    let mut mac = keyed_mac(secret)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compute HMAC-SHA1 of `message` and hex-encode it, as sent in the `sig` field
pub fn sign_message_hex(secret: &[u8], message: &[u8]) -> Result<String, SignatureError> {
    sign_message(secret, message).map(hex::encode)
}

/// Verify an HMAC-SHA1 signature in constant time
pub fn verify_signature(message: &[u8], signature: &[u8], secret: &[u8]) -> bool {
    let mut mac = match keyed_mac(secret) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(message);
    mac.verify_slice(signature).is_ok()
}

/// Decode a hex-encoded signature
pub fn decode_signature(signature_hex: &str) -> Result<Vec<u8>, SignatureError> {
    Ok(hex::decode(signature_hex)?)
}

/// Parse a decimal Unix timestamp in seconds
pub fn parse_timestamp(timestamp: &str) -> Result<i64, SignatureError> {
    Ok(timestamp.parse::<i64>()?)
}

/// Check that `timestamp` lies within `tolerance_secs` of `now`, in either direction.
/// The bound is inclusive.
pub fn is_fresh(timestamp: i64, now: i64, tolerance_secs: u64) -> bool {
    now.abs_diff(timestamp) <= tolerance_secs
}
