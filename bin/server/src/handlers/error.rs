use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::{error, info, warn};

/// Per-request failures. None of them affect other requests.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("couldn't decode sig: {0}")]
    BadSignatureEncoding(String),
    #[error("ts is not a number: {0}")]
    BadTimestamp(String),
    #[error("client id not found")]
    UnknownClient(String),
    #[error("request too old or too far in the future")]
    StaleRequest { timestamp: i64, now: i64 },
    #[error("sig does not match")]
    SignatureMismatch,
    #[error("unable to read uploaded file: {0}")]
    UploadReadFailure(String),
    #[error("unable to store uploaded file")]
    StorageWriteFailure(String),
    #[error("not found")]
    NotFound,
}

impl RelayError {
    /// Log the failure at a level matching its cause
    pub fn log(&self) {
        match self {
            RelayError::BadSignatureEncoding(reason) => {
                info!(reason = %reason, "Rejected upload: bad signature encoding")
            }
            RelayError::BadTimestamp(reason) => {
                info!(reason = %reason, "Rejected upload: bad timestamp")
            }
            RelayError::UnknownClient(client_id) => {
                warn!(client_id = ?client_id, "Rejected upload: unknown client")
            }
            RelayError::StaleRequest { timestamp, now } => {
                warn!(timestamp, now, "Rejected upload: request too old")
            }
            RelayError::SignatureMismatch => warn!("Rejected upload: signature mismatch"),
            RelayError::UploadReadFailure(reason) => {
                info!(reason = %reason, "Rejected upload: unreadable file part")
            }
            RelayError::StorageWriteFailure(reason) => {
                error!(reason = %reason, "Failed to store uploaded file")
            }
            RelayError::NotFound => {}
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::BadSignatureEncoding(_)
            | RelayError::BadTimestamp(_)
            | RelayError::UnknownClient(_)
            | RelayError::StaleRequest { .. }
            | RelayError::SignatureMismatch
            | RelayError::UploadReadFailure(_) => StatusCode::BAD_REQUEST,
            RelayError::StorageWriteFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}

/// Log a rejection and hand it back for the response
pub fn reject(err: RelayError) -> RelayError {
    err.log();
    err
}
