use crate::constants::{
    DEFAULT_HOST, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_PORT, ENV_KEY_FILE, ENV_MAX_UPLOAD_SIZE,
    ENV_SECRET, ENV_SERVER_HOST, ENV_SERVER_PORT, ENV_TOLERANCE_SECS, ENV_UPLOAD_ROOT,
};
use clap::{Arg, Command};
use crypto::{KeySource, DEFAULT_TIMESTAMP_TOLERANCE_SECS};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error("Invalid port number: {0}")]
    InvalidPort(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("No upload secret configured. Set --secret (RELAY_SECRET) or --key-file (RELAY_KEY_FILE)")]
    MissingKeySource,
    #[error("--secret and --key-file are mutually exclusive")]
    ConflictingKeySource,
    #[error("Upload secret must not be empty")]
    EmptySecret,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory uploaded files are stored in
    pub upload_root: PathBuf,
    /// Shared secret or key file used to authorize uploads
    pub key_source: KeySource,
    /// Accepted distance between request timestamp and server clock
    pub tolerance_secs: u64,
    /// Maximum multipart request size in bytes
    pub max_upload_size: usize,
}

impl ServerConfig {
    /// Load configuration from the process arguments and environment.
    /// Priority: command-line args > environment variables > defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::from_args(std::env::args_os(), |key| std::env::var(key).ok()) {
            Err(ConfigError::Args(e)) => e.exit(),
            other => other,
        }
    }

    pub fn from_args<I, T, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: Fn(&str) -> Option<String>,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let value = |arg: &str, env_key: &str| -> Option<String> {
            matches.get_one::<String>(arg).cloned().or_else(|| env(env_key))
        };

        let host = value("host", ENV_SERVER_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port_str = value("port", ENV_SERVER_PORT).unwrap_or_else(|| DEFAULT_PORT.to_string());
        let port = port_str
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_str.clone()))?;

        let upload_root = value("upload-root", ENV_UPLOAD_ROOT)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let key_source = match (value("secret", ENV_SECRET), value("key-file", ENV_KEY_FILE)) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingKeySource),
            (Some(secret), None) if secret.is_empty() => return Err(ConfigError::EmptySecret),
            (Some(secret), None) => KeySource::Shared(secret),
            (None, Some(key_file)) => KeySource::File(PathBuf::from(key_file)),
            (None, None) => return Err(ConfigError::MissingKeySource),
        };

        let tolerance_secs = match value("tolerance-secs", ENV_TOLERANCE_SECS) {
            Some(raw) => parse_number("tolerance-secs", &raw)?,
            None => DEFAULT_TIMESTAMP_TOLERANCE_SECS,
        };

        let max_upload_size = parse_number(
            "max-upload-size",
            &value("max-upload-size", ENV_MAX_UPLOAD_SIZE)
                .unwrap_or_else(|| DEFAULT_MAX_UPLOAD_SIZE.to_string()),
        )?;

        Ok(ServerConfig {
            host,
            port,
            upload_root,
            key_source,
            tolerance_secs,
            max_upload_size,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn command() -> Command {
        Command::new("server")
            .about("HTTP file relay with HMAC-authorized uploads")
            .arg(
                Arg::new("host")
                    .long("host")
                    .value_name("HOST")
                    .help("Server host (default: 0.0.0.0, or SERVER_HOST env var)"),
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .value_name("PORT")
                    .help("Server port (default: 8080, or SERVER_PORT env var)"),
            )
            .arg(
                Arg::new("upload-root")
                    .long("upload-root")
                    .value_name("DIR")
                    .help("Directory for uploaded files (default: system temp dir, or UPLOAD_ROOT env var)"),
            )
            .arg(
                Arg::new("secret")
                    .long("secret")
                    .value_name("SECRET")
                    .help("Shared secret for signing uploads (or RELAY_SECRET env var)"),
            )
            .arg(
                Arg::new("key-file")
                    .long("key-file")
                    .value_name("PATH")
                    .help("File with one id:key pair per line (or RELAY_KEY_FILE env var)"),
            )
            .arg(
                Arg::new("tolerance-secs")
                    .long("tolerance-secs")
                    .value_name("SECONDS")
                    .help("Accepted clock difference for upload timestamps (default: 30)"),
            )
            .arg(
                Arg::new("max-upload-size")
                    .long("max-upload-size")
                    .value_name("BYTES")
                    .help("Maximum upload request size in bytes (default: 104857600)"),
            )
    }
}

fn parse_number<N: std::str::FromStr>(name: &'static str, raw: &str) -> Result<N, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}
