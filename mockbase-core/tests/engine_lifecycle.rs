//! End-to-end lifecycle tests: cold starts, restarts, and durability.

mod common;

use chrono::Utc;
use common::Harness;
use mockbase_core::persistence::SESSION_STORAGE_KEY as SESSION_KEY;
use mockbase_core::{KeyValueStore, Metadata, Record, Session, User};
use serde_json::json;

fn stored_session(expires_at: Option<i64>) -> Session {
    Session {
        access_token: "stored-access-token".to_string(),
        refresh_token: "stored-refresh-token".to_string(),
        expires_in: 3600,
        expires_at,
        token_type: "bearer".to_string(),
        user: User {
            id: "mock-user-1700000000000-abcd1234".to_string(),
            email: "john.doe@example.com".to_string(),
            created_at: Utc::now(),
            email_confirmed_at: None,
            app_metadata: Metadata::new(),
            user_metadata: Metadata::new(),
        },
    }
}

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn cold_start_with_valid_session() {
    let harness = Harness::new();
    let session = stored_session(Some(Utc::now().timestamp() + 600));
    harness
        .secure
        .set(SESSION_KEY, &serde_json::to_string(&session).unwrap())
        .await
        .unwrap();

    let backend = harness.backend();
    let restored = backend.current_session().await.expect("session restored");
    assert_eq!(restored.access_token, "stored-access-token");
    assert_eq!(restored.refresh_token, "stored-refresh-token");
    assert_eq!(restored.user.email, "john.doe@example.com");
}

#[tokio::test]
async fn cold_start_with_expired_session() {
    let harness = Harness::new();
    let session = stored_session(Some(Utc::now().timestamp() - 600));
    harness
        .secure
        .set(SESSION_KEY, &serde_json::to_string(&session).unwrap())
        .await
        .unwrap();

    let backend = harness.backend();
    assert_eq!(backend.current_session().await, None);

    // The reload deleted the stale key as a side effect.
    assert_eq!(harness.secure.get(SESSION_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn session_survives_restart_without_sign_in() {
    let harness = Harness::new();
    let issued = {
        let backend = harness.backend();
        backend.sign_up("a@b.com", "pw", None).await.unwrap().session
    };

    let backend = harness.backend();
    let restored = backend.current_session().await.expect("session restored");
    assert_eq!(restored.access_token, issued.access_token);
    assert_eq!(restored.user.id, issued.user.id);
}

#[tokio::test]
async fn sign_up_then_insert_then_restart() {
    let harness = Harness::new();
    let user_id = {
        let backend = harness.backend();
        let response = backend.sign_up("a@b.com", "pw", None).await.unwrap();
        backend
            .insert_record(
                "profiles",
                &response.user.id,
                record(json!({"display_name": "Ada", "user_id": response.user.id})),
            )
            .await
            .unwrap();
        response.user.id
    };

    let backend = harness.backend();
    let profiles = backend.list_records("profiles").await;
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].get("user_id"), Some(&json!(user_id)));
    assert!(backend.get_record("profiles", &user_id).await.is_some());
}

#[tokio::test]
async fn table_record_round_trips_through_restart() {
    let harness = Harness::new();
    let row = record(json!({
        "title": "hello",
        "count": 3,
        "nested": {"tags": ["a", "b"], "ok": true},
        "maybe": null,
    }));

    {
        let backend = harness.backend();
        backend
            .insert_record("notes", "n1", row.clone())
            .await
            .unwrap();
    }

    let backend = harness.backend();
    assert_eq!(backend.get_record("notes", "n1").await, Some(row));
}

#[tokio::test]
async fn registered_users_survive_restart() {
    let harness = Harness::new();
    let original_id = {
        let backend = harness.backend();
        let response = backend.sign_up("a@b.com", "pw", None).await.unwrap();
        backend.sign_out().await.unwrap();
        response.user.id
    };

    let backend = harness.backend();
    assert_eq!(backend.current_session().await, None);
    let response = backend.sign_in("a@b.com", "pw").await.unwrap();
    // Same account, not a re-registration.
    assert_eq!(response.user.id, original_id);
}

#[tokio::test]
async fn upsert_survives_restart_with_last_write() {
    let harness = Harness::new();
    {
        let backend = harness.backend();
        backend
            .upsert_record("profiles", "p1", record(json!({"v": 1})))
            .await;
        backend
            .upsert_record("profiles", "p1", record(json!({"v": 2})))
            .await;
    }

    let backend = harness.backend();
    assert_eq!(backend.list_records("profiles").await.len(), 1);
    assert_eq!(
        backend.get_record("profiles", "p1").await,
        Some(record(json!({"v": 2})))
    );
}
