/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: &str = "8080";

/// Default maximum multipart request size in bytes (100 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: &str = "104857600";

/// Multipart fields other than the file are held in memory up to this size
pub const MULTIPART_MEMORY_LIMIT: usize = 64 * 1024;

/// Environment variable for the server host
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";

/// Environment variable for the server port
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";

/// Environment variable for the upload root directory
pub const ENV_UPLOAD_ROOT: &str = "UPLOAD_ROOT";

/// Environment variable for the shared upload secret
pub const ENV_SECRET: &str = "RELAY_SECRET";

/// Environment variable for the path to the client key file
pub const ENV_KEY_FILE: &str = "RELAY_KEY_FILE";

/// Environment variable for the timestamp tolerance in seconds
pub const ENV_TOLERANCE_SECS: &str = "RELAY_TOLERANCE_SECS";

/// Environment variable for the maximum upload size in bytes
pub const ENV_MAX_UPLOAD_SIZE: &str = "RELAY_MAX_UPLOAD_SIZE";
