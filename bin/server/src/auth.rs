use crate::handlers::error::RelayError;
use crate::state::AppState;
use crypto::{decode_signature, is_fresh, parse_timestamp, verify_signature};

/// Authorization fields sent alongside an upload
#[derive(Debug, Default, Clone, Copy)]
pub struct UploadCredentials<'a> {
    /// Client id, only consulted by multi-key servers
    pub client_id: Option<&'a str>,
    /// Decimal Unix timestamp, signed verbatim
    pub timestamp: Option<&'a str>,
    /// Hex-encoded HMAC-SHA1 of the timestamp
    pub signature: Option<&'a str>,
}

/// Handles authentication and signature verification
pub struct AuthVerifier;

impl AuthVerifier {
    /// Check an upload's credentials against the key store.
    ///
    /// Steps run in a fixed order and stop at the first failure: decode the
    /// signature, parse the timestamp, resolve the secret, check freshness,
    /// then verify the HMAC.
    pub fn authorize(
        state: &AppState,
        credentials: &UploadCredentials<'_>,
        now: i64,
    ) -> Result<(), RelayError> {
        let signature_hex = credentials
            .signature
            .ok_or_else(|| RelayError::BadSignatureEncoding("missing sig field".to_string()))?;
        let signature = decode_signature(signature_hex)
            .map_err(|e| RelayError::BadSignatureEncoding(e.to_string()))?;

        let timestamp_str = credentials
            .timestamp
            .ok_or_else(|| RelayError::BadTimestamp("missing ts field".to_string()))?;
        let timestamp =
            parse_timestamp(timestamp_str).map_err(|e| RelayError::BadTimestamp(e.to_string()))?;

        let client_id = credentials.client_id.unwrap_or_default();
        let secret = state
            .key_store
            .lookup(client_id)
            .map_err(|_| RelayError::UnknownClient(client_id.to_string()))?;

        if !is_fresh(timestamp, now, state.tolerance_secs) {
            return Err(RelayError::StaleRequest { timestamp, now });
        }

        if !verify_signature(timestamp_str.as_bytes(), &signature, secret.as_bytes()) {
            return Err(RelayError::SignatureMismatch);
        }

        Ok(())
    }
}
