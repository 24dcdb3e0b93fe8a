//! Upload secrets, either one shared secret or a per-client table loaded from a
//! key file with one `client_id:secret` pair per line.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

const KEY_FILE_DELIMITER: char = ':';

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("unable to read key file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad key file format on line {line}: expected exactly one 'id:key' pair")]
    MalformedLine { line: usize },
    #[error("client id '{0}' not found")]
    UnknownClient(String),
}

/// Secret bytes used to key the upload HMAC
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<{} bytes redacted>)", self.0.len())
    }
}

/// Where the key store gets its secrets from
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// One secret shared by every uploader
    Shared(String),
    /// Path to a file of `client_id:secret` lines
    File(PathBuf),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Shared(_) => f.write_str("Shared(<redacted>)"),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Secrets used to authorize uploads. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub enum KeyStore {
    Single(Secret),
    Multi(HashMap<String, Secret>),
}

impl KeyStore {
    pub fn load(source: &KeySource) -> Result<Self, KeyStoreError> {
        match source {
            KeySource::Shared(secret) => Ok(KeyStore::Single(Secret::new(secret.as_bytes()))),
            KeySource::File(path) => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| KeyStoreError::Unreadable {
                        path: path.clone(),
                        source,
                    })?;
                Self::parse(&contents)
            }
        }
    }

    /// Parse key file contents. Blank lines are skipped; a repeated client id
    /// replaces the earlier entry.
    pub fn parse(contents: &str) -> Result<Self, KeyStoreError> {
        let mut keys = HashMap::new();

        for (index, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let line_number = index + 1;
            let mut parts = line.split(KEY_FILE_DELIMITER);
            let (id, key) = match (parts.next(), parts.next(), parts.next()) {
                (Some(id), Some(key), None) if !id.is_empty() && !key.is_empty() => (id, key),
                _ => return Err(KeyStoreError::MalformedLine { line: line_number }),
            };

            if keys
                .insert(id.to_string(), Secret::new(key.as_bytes()))
                .is_some()
            {
                warn!(
                    client_id = ?id,
                    line = line_number,
                    "Duplicate client id in key file, later entry wins"
                );
            }
        }

        Ok(KeyStore::Multi(keys))
    }

    /// Resolve the secret for an upload. The single-key store ignores `client_id`.
    pub fn lookup(&self, client_id: &str) -> Result<&Secret, KeyStoreError> {
        match self {
            KeyStore::Single(secret) => Ok(secret),
            KeyStore::Multi(keys) => keys
                .get(client_id)
                .ok_or_else(|| KeyStoreError::UnknownClient(client_id.to_string())),
        }
    }

    /// Whether uploads must name a client id
    pub fn requires_client_id(&self) -> bool {
        matches!(self, KeyStore::Multi(_))
    }

    /// Number of configured secrets
    pub fn len(&self) -> usize {
        match self {
            KeyStore::Single(_) => 1,
            KeyStore::Multi(keys) => keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
