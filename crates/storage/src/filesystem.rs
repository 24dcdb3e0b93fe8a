//! Filesystem-based storage implementation
//!
//! Files live flat in the upload root, one per identifier. Uploads are written
//! to a hidden `.<identifier>.part` file, synced, then renamed into place.

use crate::identifier::generate_identifier;
use crate::{FileReader, Storage, StoredFile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use common::file_utils::validate_identifier;
use common::IDENTIFIER_LENGTH;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, warn};

/// Attempts at drawing an identifier that is not already taken
const MAX_IDENTIFIER_ATTEMPTS: usize = 5;

/// Filesystem-based storage implementation
pub struct FilesystemStorage {
    upload_root: PathBuf,
}

impl FilesystemStorage {
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
        }
    }

    /// Create the upload root if it does not exist yet
    pub async fn initialize(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_root)
            .await
            .with_context(|| format!("Failed to create upload root {:?}", self.upload_root))
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    fn get_file_path(&self, identifier: &str) -> PathBuf {
        self.upload_root.join(identifier)
    }

    fn get_temp_path(&self, identifier: &str) -> PathBuf {
        self.upload_root.join(format!(".{}.part", identifier))
    }

    /// Draw an identifier whose final and temp paths are both free.
    /// Not race-free against a concurrent upload drawing the same name.
    async fn reserve_identifier(&self) -> Result<String> {
        for _ in 0..MAX_IDENTIFIER_ATTEMPTS {
            let identifier = generate_identifier(IDENTIFIER_LENGTH);
            let taken = tokio::fs::try_exists(self.get_file_path(&identifier))
                .await
                .context("Failed to check for existing file")?
                || tokio::fs::try_exists(self.get_temp_path(&identifier))
                    .await
                    .context("Failed to check for pending upload")?;

            if !taken {
                return Ok(identifier);
            }
            warn!(identifier = %identifier, "Identifier collision, drawing another");
        }

        anyhow::bail!(
            "No free identifier after {} attempts",
            MAX_IDENTIFIER_ATTEMPTS
        )
    }

    /// Copy the content into a new temp file and sync it to disk
    async fn write_temp_file(
        temp_path: &Path,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<u64> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)
            .await
            .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;

        let size = tokio::io::copy(content, &mut file)
            .await
            .context("Failed to write uploaded content")?;

        file.flush().await.context("Failed to flush temp file")?;
        file.sync_all()
            .await
            .context("Failed to sync temp file to disk")?;

        Ok(size)
    }

    async fn remove_temp_file(temp_path: &Path) {
        if let Err(e) = tokio::fs::remove_file(temp_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Unable to remove temp file {:?}: {}", temp_path, e);
            }
        }
    }
}

#[async_trait]
impl Storage for FilesystemStorage {
    async fn store_file(&self, content: &mut (dyn AsyncRead + Send + Unpin)) -> Result<StoredFile> {
        let identifier = self.reserve_identifier().await?;
        let temp_path = self.get_temp_path(&identifier);
        let file_path = self.get_file_path(&identifier);

        let size = match Self::write_temp_file(&temp_path, content).await {
            Ok(size) => size,
            Err(e) => {
                Self::remove_temp_file(&temp_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&temp_path, &file_path).await {
            Self::remove_temp_file(&temp_path).await;
            return Err(e).with_context(|| format!("Failed to move upload into {:?}", file_path));
        }

        debug!(identifier = %identifier, size, "Stored file");
        Ok(StoredFile { identifier, size })
    }

    async fn open_file(&self, identifier: &str) -> Result<Option<FileReader>> {
        if validate_identifier(identifier).is_err() {
            return Ok(None);
        }

        let file_path = self.get_file_path(identifier);
        let file = match tokio::fs::File::open(&file_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open file: {:?}", file_path))
            }
        };

        let metadata = file
            .metadata()
            .await
            .with_context(|| format!("Failed to stat file: {:?}", file_path))?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(Box::new(file)))
    }
}
