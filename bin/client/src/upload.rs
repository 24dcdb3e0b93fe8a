use anyhow::{Context, Result};
use common::{FIELD_CLIENT_ID, FIELD_FILE, FIELD_SIGNATURE, FIELD_TIMESTAMP, UPLOAD_ENDPOINT};
use crypto::sign_message_hex;
use log::info;
use reqwest::blocking::{multipart, Client};
use std::fs;
use std::path::Path;

/// Timestamp and matching signature for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTimestamp {
    pub ts: String,
    pub sig: String,
}

/// Sign the decimal form of `timestamp` with the shared secret
pub fn sign_timestamp(secret: &str, timestamp: i64) -> Result<SignedTimestamp> {
    let ts = timestamp.to_string();
    let sig = sign_message_hex(secret.as_bytes(), ts.as_bytes())
        .context("Failed to sign timestamp")?;
    Ok(SignedTimestamp { ts, sig })
}

/// Handles file uploads to the server
pub struct FileUploader {
    server: String,
    secret: String,
    client_id: Option<String>,
    client: Client,
}

impl FileUploader {
    /// Create a new file uploader
    pub fn new(server: &str, secret: String, client_id: Option<String>) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            secret,
            client_id,
            client: Client::new(),
        }
    }

    /// Upload one file, returning the retrieval URL the server handed back
    pub fn upload(&self, path: &Path) -> Result<String> {
        let content = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let signed = sign_timestamp(&self.secret, common::current_timestamp_secs())?;
        let form = self.build_multipart_form(&signed, filename.clone(), content)?;

        let url = format!("{}{}", self.server, UPLOAD_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .context("Failed to connect to server")?;

        let status = response.status();
        let body = response
            .text()
            .context("Failed to read server response")?;
        if !status.is_success() {
            anyhow::bail!("Upload failed for file {}: {} - {}", filename, status, body);
        }

        info!("Uploaded file {} to {}", filename, body);
        Ok(body)
    }

    /// Build multipart form for file upload
    fn build_multipart_form(
        &self,
        signed: &SignedTimestamp,
        filename: String,
        content: Vec<u8>,
    ) -> Result<multipart::Form> {
        let mut form = multipart::Form::new()
            .text(FIELD_TIMESTAMP, signed.ts.clone())
            .text(FIELD_SIGNATURE, signed.sig.clone());

        if let Some(client_id) = &self.client_id {
            form = form.text(FIELD_CLIENT_ID, client_id.clone());
        }

        Ok(form.part(
            FIELD_FILE,
            multipart::Part::bytes(content)
                .file_name(filename)
                .mime_str("application/octet-stream")
                .context("Failed to set MIME type")?,
        ))
    }
}
