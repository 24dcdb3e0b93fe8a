/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Environment variable holding the shared upload secret
pub const ENV_SECRET: &str = "RELAY_SECRET";

/// Environment variable holding the client id for multi-key servers
pub const ENV_CLIENT_ID: &str = "RELAY_CLIENT_ID";
