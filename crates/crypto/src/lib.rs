//! Shared-secret authentication primitives for the file relay.
//!
//! Uploads carry a decimal Unix timestamp and an HMAC-SHA1 of that exact string,
//! keyed with a secret from the [`KeyStore`].

pub mod keystore;
pub mod signature;

pub use keystore::{KeySource, KeyStore, KeyStoreError, Secret};
pub use signature::{
    decode_signature, is_fresh, parse_timestamp, sign_message, sign_message_hex,
    verify_signature, SignatureError, DEFAULT_TIMESTAMP_TOLERANCE_SECS,
};
