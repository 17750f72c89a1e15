#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Backend client integration tests
//!
//! Drives the native REST client against the mock backend and feeds the
//! results through the feed reducer the way the notification widget does.

#[allow(dead_code)]
mod mock_servers;

use event_hive_client::app::api::{ApiError, BackendClient};
use event_hive_client::app::session::Session;
use event_hive_client::notifications::{reduce, FeedAction, FeedState, RecordId};
use mock_servers::MockBackend;
use serde_json::json;

const TOKEN: &str = "secret-token";

#[tokio::test]
async fn test_verify_token_populates_session() {
    let backend = MockBackend::start(TOKEN).await;
    let client = BackendClient::new(backend.url());

    let info = client.verify_token(TOKEN).await.unwrap();
    let session = Session::from_auth(info);
    assert!(session.authenticated);
    assert!(session.is_admin);
    assert_eq!(session.username, "admin");

    backend.set_user(None, false).await;
    let session = Session::from_auth(client.verify_token(TOKEN).await.unwrap());
    assert_eq!(session.username, "User");
    assert!(!session.is_admin);

    backend.stop().await;
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let backend = MockBackend::start(TOKEN).await;
    let client = BackendClient::new(backend.url());

    let err = client.verify_token("stale").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);

    backend.stop().await;
}

#[tokio::test]
async fn test_bootstrap_counts_unread() {
    let backend = MockBackend::start(TOKEN).await;
    backend
        .add_notification(json!({"id": "n1", "type": "event", "message": "a", "isRead": false}))
        .await;
    backend
        .add_notification(json!({"id": "n2", "type": "event", "message": "b", "isRead": true}))
        .await;
    let client = BackendClient::new(backend.url());

    let list = client.admin_notifications(TOKEN).await.unwrap();
    let mut feed = FeedState::default();
    reduce(&mut feed, FeedAction::Loaded(list));

    assert_eq!(feed.len(), 2);
    assert_eq!(feed.unread_count(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_one_bad_record_does_not_sink_bootstrap() {
    let backend = MockBackend::start(TOKEN).await;
    backend
        .add_notification(json!({"id": "n1", "type": "event", "message": "a", "isRead": 0}))
        .await;
    backend
        .add_notification(json!({"type": "event", "message": "missing id"}))
        .await;
    backend
        .add_notification(json!({"id": "n2", "type": "event", "message": null, "isRead": 1}))
        .await;
    let client = BackendClient::new(backend.url());

    let list = client.admin_notifications(TOKEN).await.unwrap();
    let mut feed = FeedState::default();
    reduce(&mut feed, FeedAction::Loaded(list));

    assert_eq!(feed.len(), 2);
    assert!(feed.contains(&RecordId::new("n1")));
    assert!(feed.contains(&RecordId::new("n2")));
    assert_eq!(feed.unread_count(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_numeric_ids_and_encoded_metadata_decode() {
    let backend = MockBackend::start(TOKEN).await;
    backend
        .add_notification(json!({
            "id": 17,
            "type": "review",
            "message": "New review",
            "relatedId": 3,
            "isRead": false,
            "metadata": "{\"eventId\":9,\"rating\":5,\"productName\":\"Gala\"}"
        }))
        .await;
    let client = BackendClient::new(backend.url());

    let list = client.admin_notifications(TOKEN).await.unwrap();
    assert_eq!(list[0].id, RecordId::new("17"));
    assert_eq!(list[0].rating(), Some(5));
    assert_eq!(list[0].product_name(), Some("Gala"));

    backend.stop().await;
}

#[tokio::test]
async fn test_mark_read_is_confirmed_by_server() {
    let backend = MockBackend::start(TOKEN).await;
    backend
        .add_notification(json!({"id": "n1", "isRead": false}))
        .await;
    backend
        .add_notification(json!({"id": "n2", "isRead": false}))
        .await;
    let client = BackendClient::new(backend.url());

    let mut feed = FeedState::default();
    reduce(
        &mut feed,
        FeedAction::Loaded(client.admin_notifications(TOKEN).await.unwrap()),
    );

    let id = RecordId::new("n1");
    client
        .mark_admin_notification_read(TOKEN, &id)
        .await
        .unwrap();
    assert!(reduce(&mut feed, FeedAction::MarkedRead(id)));
    assert_eq!(feed.unread_count(), 1);
    assert_eq!(backend.is_read("n1").await, Some(true));
    assert_eq!(backend.is_read("n2").await, Some(false));

    client.mark_all_admin_notifications_read(TOKEN).await.unwrap();
    reduce(&mut feed, FeedAction::MarkedAllRead);
    assert_eq!(feed.unread_count(), 0);
    assert_eq!(backend.is_read("n2").await, Some(true));

    backend.stop().await;
}

#[tokio::test]
async fn test_failed_mark_read_leaves_feed_unchanged() {
    let backend = MockBackend::start(TOKEN).await;
    backend
        .add_notification(json!({"id": "n1", "isRead": false}))
        .await;
    let client = BackendClient::new(backend.url());

    let mut feed = FeedState::default();
    reduce(
        &mut feed,
        FeedAction::Loaded(client.admin_notifications(TOKEN).await.unwrap()),
    );

    let err = client
        .mark_admin_notification_read(TOKEN, &RecordId::new("missing"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Status(404));
    assert_eq!(feed.unread_count(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_delete_event() {
    let backend = MockBackend::start(TOKEN).await;
    let client = BackendClient::new(backend.url());

    client.delete_event(TOKEN, "42").await.unwrap();
    assert_eq!(backend.deleted_events().await, vec!["42".to_string()]);

    let err = client.delete_event("expired", "43").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(backend.deleted_events().await.len(), 1);

    backend.stop().await;
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = BackendClient::new(format!("http://{}", addr));
    let err = client.admin_notifications(TOKEN).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
