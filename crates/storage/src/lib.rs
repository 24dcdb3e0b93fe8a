pub mod filesystem;
pub mod identifier;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncRead;

pub use filesystem::FilesystemStorage;
pub use identifier::generate_identifier;

/// Readable handle on a stored file
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

/// Result of a successful store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Identifier the file can be retrieved by
    pub identifier: String,
    /// Number of bytes written
    pub size: u64,
}

/// Storage backend trait for uploaded files
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a new file under a freshly generated identifier.
    /// Either the whole content is committed or nothing is left behind.
    async fn store_file(&self, content: &mut (dyn AsyncRead + Send + Unpin)) -> Result<StoredFile>;

    /// Open a stored file for reading, `None` if no such file exists
    async fn open_file(&self, identifier: &str) -> Result<Option<FileReader>>;
}
