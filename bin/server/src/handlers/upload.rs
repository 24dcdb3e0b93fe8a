use crate::auth::{AuthVerifier, UploadCredentials};
use crate::handlers::error::{reject, RelayError};
use crate::handlers::upload_form::UploadForm;
use crate::state::AppState;
use actix_multipart::form::MultipartForm;
use actix_web::http::header::{self, ContentType};
use actix_web::{post, web, HttpRequest, HttpResponse};
use common::current_timestamp_secs;
use tracing::info;

/// Handle file upload (multipart/form-data)
#[post("/upload")]
pub async fn upload(
    req: HttpRequest,
    form: MultipartForm<UploadForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, RelayError> {
    let form = form.into_inner();

    let credentials = UploadCredentials {
        client_id: form.client_id(),
        timestamp: form.timestamp(),
        signature: form.signature(),
    };
    AuthVerifier::authorize(&state, &credentials, current_timestamp_secs()).map_err(reject)?;

    let upload = form
        .file
        .as_ref()
        .ok_or_else(|| reject(RelayError::UploadReadFailure("missing file field".to_string())))?;

    let mut content = tokio::fs::File::open(upload.file.path())
        .await
        .map_err(|e| reject(RelayError::UploadReadFailure(e.to_string())))?;

    let stored = state
        .storage
        .store_file(&mut content)
        .await
        .map_err(|e| reject(RelayError::StorageWriteFailure(format!("{:#}", e))))?;

    let url = format!("http://{}/{}", request_host(&req), stored.identifier);

    // Debug formatting escapes control characters in client-supplied values
    info!(
        client_id = ?form.client_id(),
        identifier = %stored.identifier,
        size = stored.size,
        "POST /upload - File stored"
    );

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(url))
}

/// Host the client addressed. Forwarding headers are not consulted.
fn request_host(req: &HttpRequest) -> &str {
    req.headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().authority().map(|authority| authority.as_str()))
        .unwrap_or_else(|| req.app_config().host())
}
