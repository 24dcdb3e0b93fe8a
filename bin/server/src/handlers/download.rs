use crate::handlers::error::RelayError;
use crate::state::AppState;
use actix_web::http::header::ContentType;
use actix_web::{get, web, HttpResponse};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

/// Stream a stored file back by identifier
#[get("/{identifier}")]
pub async fn download(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, RelayError> {
    let identifier = path.into_inner();

    let reader = match state.storage.open_file(&identifier).await {
        Ok(Some(reader)) => reader,
        Ok(None) => {
            debug!(identifier = ?identifier, "GET - file not found");
            return Err(RelayError::NotFound);
        }
        Err(e) => {
            warn!(identifier = ?identifier, "GET - unable to open file: {:#}", e);
            return Err(RelayError::NotFound);
        }
    };

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::octet_stream())
        .streaming(ReaderStream::new(reader)))
}

/// Fallback for any path that is not a single segment
pub async fn not_found() -> Result<HttpResponse, RelayError> {
    Err(RelayError::NotFound)
}
