//! Opaque token generation and session validity.

use chrono::Utc;
use rand::Rng;

use crate::types::Session;

/// Tokens are truncated to this length.
const TOKEN_MAX_LEN: usize = 100;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Returns `len` random base-36 characters.
pub(crate) fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

/// Generates an opaque token: prefix, current millisecond timestamp, and two
/// independent random base-36 fragments, truncated to 100 characters.
///
/// Uniqueness is probabilistic, not guaranteed, and no cryptographic strength
/// is implied. Callers must treat the result as fully opaque.
#[must_use]
pub fn generate_token(prefix: &str) -> String {
    let mut token = format!(
        "{prefix}-{}-{}-{}",
        Utc::now().timestamp_millis(),
        random_base36(10),
        random_base36(10),
    );
    token.truncate(TOKEN_MAX_LEN);
    token
}

/// Whether a session counts as live.
///
/// `None` is never valid. A session without `expires_at` never expires --
/// some callers construct such sessions deliberately, so the absence is
/// honored rather than treated as invalid. Otherwise the session is live iff
/// `expires_at` is strictly in the future.
#[must_use]
pub fn is_session_valid(session: Option<&Session>) -> bool {
    session.is_some_and(|session| match session.expires_at {
        None => true,
        Some(expires_at) => expires_at > Utc::now().timestamp(),
    })
}
