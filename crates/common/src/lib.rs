pub mod file_utils;
pub mod utils;

use serde::{Deserialize, Serialize};

pub use utils::current_timestamp_secs;

/// Number of characters in a generated file identifier
pub const IDENTIFIER_LENGTH: usize = 8;

/// Upload endpoint path
pub const UPLOAD_ENDPOINT: &str = "/upload";

/// Health check endpoint path
pub const HEALTH_ENDPOINT: &str = "/health";

/// Multipart field carrying the client id (multi-key servers only)
pub const FIELD_CLIENT_ID: &str = "id";

/// Multipart field carrying the decimal Unix timestamp
pub const FIELD_TIMESTAMP: &str = "ts";

/// Multipart field carrying the hex-encoded HMAC-SHA1 of the timestamp
pub const FIELD_SIGNATURE: &str = "sig";

/// Multipart field carrying the file payload
pub const FIELD_FILE: &str = "file";

/// Response from health check endpoint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String, // "ok" when healthy
}
