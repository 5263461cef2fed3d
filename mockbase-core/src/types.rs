//! Core auth and table-store data model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Loosely-typed metadata attached to users.
///
/// Callers stash arbitrary key/value pairs here; no fixed schema is imposed.
pub type Metadata = serde_json::Map<String, Value>;

/// One table record: field name to JSON-compatible value.
pub type Record = serde_json::Map<String, Value>;

/// The table store: table name -> record id -> record.
///
/// Tables are created lazily on first write and are fully independent -- no
/// foreign keys, no cross-table integrity.
pub type Tables = BTreeMap<String, BTreeMap<String, Record>>;

/// A user identity record.
///
/// Created at sign-up and immutable thereafter except for metadata patches
/// from profile updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque generated id, unique within the mock instance.
    pub id: String,
    /// Email address; the unique key into the users table.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Unset by default -- models "confirmation required" flows.
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Application-level metadata. Empty at creation.
    #[serde(default)]
    pub app_metadata: Metadata,
    /// Derived `first_name`/`last_name`/`full_name`/`avatar_url` plus
    /// caller-supplied overrides (caller wins on key collision).
    #[serde(default)]
    pub user_metadata: Metadata,
}

/// An issued credential pair with an expiry, bound to one user.
///
/// The embedded user is a snapshot taken at issue time; it is not updated
/// when the live user record changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// Session lifetime in seconds at creation.
    pub expires_in: i64,
    /// Absolute Unix-seconds expiry. Absent means "never expires" -- some
    /// callers construct sessions without an expiry deliberately, and that
    /// behavior is preserved.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Always `"bearer"`.
    pub token_type: String,
    /// The user this session was issued to.
    pub user: User,
}

/// Persisted credential row for one registered user.
///
/// Serialized inside the users blob as the object half of an
/// `[email, {email, password, user}]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Email, repeated from the pair key.
    pub email: String,
    /// Password as supplied at sign-up. This is a mock; nothing is hashed.
    pub password: String,
    /// The identity record.
    pub user: User,
}

/// Result payload of sign-up and sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    /// The signed-in user.
    pub user: User,
    /// The freshly issued session.
    pub session: Session,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_wire_shape() {
        let json = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "expires_at": 1700003600,
            "token_type": "bearer",
            "user": {
                "id": "mock-user-1",
                "email": "a@b.com",
                "created_at": "2024-01-01T00:00:00Z"
            }
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.expires_at, Some(1_700_003_600));
        assert!(session.user.email_confirmed_at.is_none());
        assert!(session.user.user_metadata.is_empty());
    }

    #[test]
    fn session_without_expiry_deserializes() {
        let json = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "u",
                "email": "a@b.com",
                "created_at": "2024-01-01T00:00:00Z"
            }
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.expires_at, None);
    }

    #[test]
    fn user_record_pair_wire_shape() {
        // The users blob is an array of [email, record] pairs.
        let json = r#"[
            ["a@b.com", {
                "email": "a@b.com",
                "password": "pw",
                "user": {
                    "id": "u1",
                    "email": "a@b.com",
                    "created_at": "2024-01-01T00:00:00Z"
                }
            }]
        ]"#;
        let pairs: Vec<(String, UserRecord)> = serde_json::from_str(json).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "a@b.com");
        assert_eq!(pairs[0].1.password, "pw");
    }
}
