/// Get current timestamp in seconds since Unix epoch
/// This is the value clients sign and servers check for freshness
pub fn current_timestamp_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
