//! Random handles for stored files

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate an identifier of `length` characters drawn uniformly from `[a-zA-Z0-9]`.
///
/// Uses the thread-local generator, which is seeded from the OS on first use in
/// each thread, so concurrent uploads never share generator state.
pub fn generate_identifier(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
