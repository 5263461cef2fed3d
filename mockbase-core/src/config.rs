//! Engine configuration.

/// Tuning knobs for the mock backend.
///
/// The defaults reproduce the behavior of the service this engine stands in
/// for; overriding them is only interesting in tests.
#[derive(Debug, Clone)]
pub struct MockBackendConfig {
    /// Session lifetime in seconds. Sessions are issued with
    /// `expires_at = now + session_ttl_seconds`.
    pub session_ttl_seconds: i64,
    /// Prefix distinguishing access tokens.
    pub access_token_prefix: String,
    /// Prefix distinguishing refresh tokens.
    pub refresh_token_prefix: String,
    /// Avatar-initials service the generated `avatar_url` points at.
    pub avatar_base_url: String,
}

impl Default for MockBackendConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: 3600,
            access_token_prefix: "mock-access-token".to_string(),
            refresh_token_prefix: "mock-refresh-token".to_string(),
            avatar_base_url: "https://ui-avatars.com/api/".to_string(),
        }
    }
}
