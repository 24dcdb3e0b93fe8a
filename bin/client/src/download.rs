use anyhow::{Context, Result};
use common::file_utils::validate_identifier;
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};

/// Where to fetch a stored file from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub identifier: String,
}

impl DownloadTarget {
    /// Accept either a bare identifier, resolved against `server`, or the full
    /// URL returned by an upload.
    pub fn resolve(target: &str, server: &str) -> Result<Self> {
        let (url, identifier) = if target.contains("://") {
            let identifier = target
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            (target.to_string(), identifier)
        } else {
            let identifier = target.to_string();
            (
                format!("{}/{}", server.trim_end_matches('/'), identifier),
                identifier,
            )
        };

        validate_identifier(&identifier)
            .map_err(|e| anyhow::anyhow!("{}: {:?}", e.message(), identifier))?;

        Ok(Self { url, identifier })
    }
}

/// Fetch a stored file and write it to `output`, or to a file named after the
/// identifier in the current directory.
pub fn download_file(target: &DownloadTarget, output: Option<&Path>) -> Result<PathBuf> {
    let response = Client::new()
        .get(&target.url)
        .send()
        .context("Failed to connect to server")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        anyhow::bail!("Download failed: {} - {}", status, error_text.trim());
    }

    let content = response
        .bytes()
        .context("Failed to read file content from server")?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&target.identifier));
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(&output_path, &content).context("Failed to write downloaded file")?;

    info!(
        "Downloaded {} ({} bytes) to {:?}",
        target.identifier,
        content.len(),
        output_path
    );
    Ok(output_path)
}
