//! Plausible identity derivation for mock users.
//!
//! Sign-up only receives an email address, so the engine fabricates a display
//! identity good enough for demos: structured local parts (`john.doe@...`)
//! split deterministically into first/last name, everything else falls back
//! to fixed name lists picked at random. The result is plausible, not
//! meaningful, and not stable across runs on the fallback path.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde_json::Value;

use crate::config::MockBackendConfig;
use crate::token::{generate_token, random_base36};
use crate::types::{Metadata, Session, User};

/// Fallback first names for unusable local parts.
const FIRST_NAMES: [&str; 20] = [
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael",
    "Linda", "David", "Elizabeth", "William", "Barbara", "Richard", "Susan",
    "Joseph", "Jessica", "Thomas", "Sarah", "Daniel", "Karen",
];

/// Fallback surnames for emails with no separator in the local part.
const SURNAMES: [&str; 20] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller",
    "Davis", "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez",
    "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Martin",
];

/// Display identity derived from an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedName {
    /// Derived or randomized first name.
    pub first_name: String,
    /// Derived or randomized last name.
    pub last_name: String,
    /// `"{first_name} {last_name}"`.
    pub full_name: String,
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}

fn pick(list: &[&str]) -> String {
    let mut rng = thread_rng();
    (*list.choose(&mut rng).unwrap_or(&list[0])).to_string()
}

/// Derives first/last/full name from the local part of `email`.
///
/// A local part containing `.` or `_` is split on the first occurrence and
/// both segments are title-cased -- that path is deterministic. Otherwise the
/// title-cased local part becomes the first name and the surname is drawn at
/// random. Any derived name shorter than 2 characters is replaced from the
/// fixed lists.
#[must_use]
pub fn extract_name_from_email(email: &str) -> ExtractedName {
    let local = email.split('@').next().unwrap_or("");

    let (first_raw, last_raw) = match local.find(['.', '_']) {
        Some(idx) => (&local[..idx], Some(&local[idx + 1..])),
        None => (local, None),
    };

    let mut first_name = title_case(first_raw);
    let mut last_name = match last_raw {
        Some(rest) if !rest.is_empty() => title_case(rest),
        _ => pick(&SURNAMES),
    };

    if first_name.chars().count() < 2 {
        first_name = pick(&FIRST_NAMES);
    }
    if last_name.chars().count() < 2 {
        last_name = pick(&SURNAMES);
    }

    let full_name = format!("{first_name} {last_name}");
    ExtractedName {
        first_name,
        last_name,
        full_name,
    }
}

/// Builds a believable user for `email`.
///
/// Derived name fields and a generated avatar URL are merged with
/// `overrides`, the caller's fields taking precedence on collision. The
/// email-confirmation timestamp is left unset.
#[must_use]
pub fn create_mock_user(
    email: &str,
    overrides: Option<Metadata>,
    config: &MockBackendConfig,
) -> User {
    let name = extract_name_from_email(email);

    let mut user_metadata = Metadata::new();
    user_metadata.insert(
        "first_name".to_string(),
        Value::String(name.first_name.clone()),
    );
    user_metadata.insert(
        "last_name".to_string(),
        Value::String(name.last_name.clone()),
    );
    user_metadata.insert(
        "full_name".to_string(),
        Value::String(name.full_name.clone()),
    );
    user_metadata.insert(
        "avatar_url".to_string(),
        Value::String(format!(
            "{}?name={}",
            config.avatar_base_url,
            name.full_name.replace(' ', "+"),
        )),
    );
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            user_metadata.insert(key, value);
        }
    }

    User {
        id: format!(
            "mock-user-{}-{}",
            Utc::now().timestamp_millis(),
            random_base36(8),
        ),
        email: email.to_string(),
        created_at: Utc::now(),
        email_confirmed_at: None,
        app_metadata: Metadata::new(),
        user_metadata,
    }
}

/// Issues a fresh session for `user` with the configured lifetime.
#[must_use]
pub fn create_mock_session(user: User, config: &MockBackendConfig) -> Session {
    let now = Utc::now().timestamp();
    Session {
        access_token: generate_token(&config.access_token_prefix),
        refresh_token: generate_token(&config.refresh_token_prefix),
        expires_in: config.session_ttl_seconds,
        expires_at: Some(now + config.session_ttl_seconds),
        token_type: "bearer".to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_email_is_deterministic() {
        for _ in 0..20 {
            let name = extract_name_from_email("john.doe@example.com");
            assert_eq!(name.first_name, "John");
            assert_eq!(name.last_name, "Doe");
            assert_eq!(name.full_name, "John Doe");
        }
    }

    #[test]
    fn underscore_separator_also_splits() {
        let name = extract_name_from_email("jane_roe@example.com");
        assert_eq!(name.first_name, "Jane");
        assert_eq!(name.last_name, "Roe");
    }

    #[test]
    fn split_is_on_first_separator() {
        let name = extract_name_from_email("mary.van.dam@example.com");
        assert_eq!(name.first_name, "Mary");
        assert_eq!(name.last_name, "Van.dam");
    }

    #[test]
    fn plain_local_part_gets_random_surname() {
        let name = extract_name_from_email("alice@example.com");
        assert_eq!(name.first_name, "Alice");
        assert!(SURNAMES.contains(&name.last_name.as_str()));
    }

    #[test]
    fn too_short_names_are_replaced() {
        let name = extract_name_from_email("a@example.com");
        assert!(FIRST_NAMES.contains(&name.first_name.as_str()));
        assert!(SURNAMES.contains(&name.last_name.as_str()));

        // Trailing separator leaves an empty second segment.
        let name = extract_name_from_email("bob.@example.com");
        assert_eq!(name.first_name, "Bob");
        assert!(SURNAMES.contains(&name.last_name.as_str()));
    }

    #[test]
    fn mock_user_fields() {
        let config = MockBackendConfig::default();
        let user = create_mock_user("john.doe@example.com", None, &config);

        assert!(user.id.starts_with("mock-user-"));
        assert_eq!(user.email, "john.doe@example.com");
        assert!(user.email_confirmed_at.is_none());
        assert!(user.app_metadata.is_empty());
        assert_eq!(
            user.user_metadata.get("full_name"),
            Some(&Value::String("John Doe".to_string()))
        );
        let avatar = user.user_metadata.get("avatar_url").unwrap();
        assert_eq!(
            avatar,
            &Value::String("https://ui-avatars.com/api/?name=John+Doe".to_string())
        );
    }

    #[test]
    fn caller_overrides_win_on_collision() {
        let config = MockBackendConfig::default();
        let mut overrides = Metadata::new();
        overrides.insert(
            "full_name".to_string(),
            Value::String("Custom Name".to_string()),
        );
        overrides.insert("plan".to_string(), Value::String("pro".to_string()));

        let user = create_mock_user("john.doe@example.com", Some(overrides), &config);
        assert_eq!(
            user.user_metadata.get("full_name"),
            Some(&Value::String("Custom Name".to_string()))
        );
        assert_eq!(
            user.user_metadata.get("plan"),
            Some(&Value::String("pro".to_string()))
        );
        // Non-colliding derived fields survive.
        assert_eq!(
            user.user_metadata.get("first_name"),
            Some(&Value::String("John".to_string()))
        );
    }

    #[test]
    fn mock_session_lifetime_and_prefixes() {
        let config = MockBackendConfig::default();
        let user = create_mock_user("john.doe@example.com", None, &config);
        let before = Utc::now().timestamp();
        let session = create_mock_session(user, &config);

        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.token_type, "bearer");
        assert!(session.access_token.starts_with("mock-access-token-"));
        assert!(session.refresh_token.starts_with("mock-refresh-token-"));
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at >= before + 3600);
        assert!(expires_at <= Utc::now().timestamp() + 3600);
    }
}
