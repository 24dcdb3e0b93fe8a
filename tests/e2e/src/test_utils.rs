use anyhow::{Context, Result};
use common::{
    FIELD_CLIENT_ID, FIELD_FILE, FIELD_SIGNATURE, FIELD_TIMESTAMP, HEALTH_ENDPOINT, UPLOAD_ENDPOINT,
};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::time::sleep;

/// Credentials the harness uploads with
pub struct UploadAuth {
    pub secret: String,
    pub client_id: Option<String>,
}

/// Write `count` files of random bytes, returning their paths
pub fn create_test_files(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    let mut rng = rand::thread_rng();
    let mut paths = Vec::with_capacity(count);
    for i in 0..count {
        let mut content = vec![0u8; 1024 * (i + 1)];
        rng.fill_bytes(&mut content);
        let file_path = dir.join(format!("file{}.bin", i));
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to create test file: {:?}", file_path))?;
        paths.push(file_path);
    }
    Ok(paths)
}

pub async fn wait_for_server(url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let health_url = format!("{}{}", url, HEALTH_ENDPOINT);

    println!("Waiting for server to be ready...");
    for i in 0..30 {
        match client.get(&health_url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    println!("Server is ready!");
                    return Ok(());
                }
            }
            Err(_) => {
                if i < 29 {
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    anyhow::bail!("Server did not become ready within 30 seconds");
}

/// Upload one file with the client binary and return the URL it prints
pub fn upload_file(
    client_binary: &Path,
    file: &Path,
    server_url: &str,
    auth: &UploadAuth,
) -> Result<String> {
    let mut command = Command::new(client_binary);
    command
        .arg("upload")
        .arg(file)
        .arg("--server")
        .arg(server_url)
        .env("RELAY_SECRET", &auth.secret)
        .env_remove("RELAY_CLIENT_ID");
    if let Some(client_id) = &auth.client_id {
        command.arg("--id").arg(client_id);
    }

    let output = command
        .output()
        .with_context(|| format!("Failed to run client binary: {:?}", client_binary))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        anyhow::bail!("Upload failed:\nSTDOUT: {}\nSTDERR: {}", stdout, stderr);
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    tracing::debug!(file = ?file, url = %url, "Uploaded");
    Ok(url)
}

/// Download a stored file with the client binary into `output`
pub fn download_file(client_binary: &Path, url: &str, output: &Path) -> Result<()> {
    let output = Command::new(client_binary)
        .arg("download")
        .arg(url)
        .arg("--output")
        .arg(output)
        .output()
        .with_context(|| "Failed to run download command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        anyhow::bail!("Download failed:\nSTDOUT: {}\nSTDERR: {}", stdout, stderr);
    }

    Ok(())
}

/// Post a correctly signed upload whose timestamp is `age_secs` in the past.
/// Returns the status code and response body.
pub async fn upload_with_age(
    server_url: &str,
    auth: &UploadAuth,
    age_secs: i64,
) -> Result<(reqwest::StatusCode, String)> {
    let ts = (common::current_timestamp_secs() - age_secs).to_string();
    let sig = crypto::sign_message_hex(auth.secret.as_bytes(), ts.as_bytes())
        .context("Failed to sign timestamp")?;

    let mut form = reqwest::multipart::Form::new()
        .text(FIELD_TIMESTAMP, ts)
        .text(FIELD_SIGNATURE, sig)
        .part(
            FIELD_FILE,
            reqwest::multipart::Part::bytes(b"stale".to_vec()).file_name("stale.bin"),
        );
    if let Some(client_id) = &auth.client_id {
        form = form.text(FIELD_CLIENT_ID, client_id.clone());
    }

    let response = reqwest::Client::new()
        .post(format!("{}{}", server_url, UPLOAD_ENDPOINT))
        .multipart(form)
        .send()
        .await
        .context("Failed to connect to server")?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Ok((status, body))
}

/// Identifier at the end of a retrieval URL
pub fn identifier_from_url(url: &str) -> Result<String> {
    let identifier = url
        .rsplit('/')
        .next()
        .filter(|id| common::file_utils::validate_identifier(id).is_ok())
        .with_context(|| format!("Upload returned an unexpected URL: {}", url))?;
    Ok(identifier.to_string())
}
