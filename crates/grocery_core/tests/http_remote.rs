//! HttpRemote against the fake item server

use grocery_config::RemoteConfig;
use grocery_core::{CheckedPatch, HttpRemote, Item, ItemRemote, SyncError, SyncOperation};
use grocery_test_helpers::prelude::*;
use serde_json::json;

fn remote_for(server: &FakeItemServer) -> HttpRemote {
    HttpRemote::new(&RemoteConfig {
        api_url: server.url(),
        timeout_secs: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_load_all_numeric_and_string_ids() {
    suppress_logs();
    let server = FakeItemServer::with_items(vec![
        json!({"id": 1, "checked": false, "item": "Bread"}),
        json!({"id": "2", "checked": true, "item": "Milk"}),
    ]);
    let remote = remote_for(&server);

    let items = remote.load_all().await.unwrap();
    let mut milk = Item::new(2, "Milk");
    milk.checked = true;
    assert_eq!(items, vec![Item::new(1, "Bread"), milk]);
}

#[tokio::test]
async fn test_create_posts_full_item() {
    let server = FakeItemServer::start();
    let remote = remote_for(&server);

    remote.create(&Item::new(1, "Eggs")).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/items");
    assert_eq!(
        requests[0].body,
        Some(json!({"id": 1, "checked": false, "item": "Eggs"}))
    );
}

#[tokio::test]
async fn test_update_patches_checked_only() {
    let server = FakeItemServer::with_items(vec![json!({"id": 4, "checked": false, "item": "Tea"})]);
    let remote = remote_for(&server);

    remote.update(4, CheckedPatch { checked: true }).await.unwrap();

    let request = server.requests().pop().unwrap();
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.path, "/items/4");
    assert_eq!(request.body, Some(json!({"checked": true})));
    assert_eq!(server.items()[0]["checked"], json!(true));
    assert_eq!(server.items()[0]["item"], json!("Tea"));
}

#[tokio::test]
async fn test_delete_removes_record() {
    let server = FakeItemServer::with_items(vec![json!({"id": 4, "checked": false, "item": "Tea"})]);
    let remote = remote_for(&server);

    remote.delete(4).await.unwrap();
    assert!(server.items().is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_sync_error() {
    let server = FakeItemServer::start();
    server.fail_with(500);
    let remote = remote_for(&server);

    let err = remote.create(&Item::new(1, "Milk")).await.unwrap_err();
    assert_eq!(
        err,
        SyncError::Status {
            operation: SyncOperation::Create(1),
            status: 500,
            detail: Some("Injected failure".to_string()),
        }
    );
    assert!(err.to_string().starts_with("Please reload the app."));
}

#[tokio::test]
async fn test_delete_unknown_id_is_sync_error() {
    let server = FakeItemServer::start();
    let remote = remote_for(&server);

    let err = remote.delete(9).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Status {
            status: 404,
            detail: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_body_is_sync_error() {
    let server = FakeItemServer::start();
    server.serve_raw_list(r#"[{"id": 1, "item": "Bread"}]"#);
    let remote = remote_for(&server);

    let err = remote.load_all().await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Malformed {
            operation: SyncOperation::Load,
            ..
        }
    ));
    assert!(err.to_string().starts_with("Did not receive expected data."));
}

#[tokio::test]
async fn test_non_json_body_is_sync_error() {
    let server = FakeItemServer::start();
    server.serve_raw_list("<html>maintenance</html>");
    let remote = remote_for(&server);

    assert!(matches!(
        remote.load_all().await,
        Err(SyncError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_ids_rejected_at_boundary() {
    let server = FakeItemServer::with_items(vec![
        json!({"id": 1, "checked": false, "item": "Bread"}),
        json!({"id": "1", "checked": false, "item": "Milk"}),
    ]);
    let remote = remote_for(&server);

    assert!(matches!(
        remote.load_all().await,
        Err(SyncError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let url = {
        let server = FakeItemServer::start();
        server.url()
    };
    let remote = HttpRemote::new(&RemoteConfig {
        api_url: url,
        timeout_secs: Some(2),
    })
    .unwrap();

    let err = remote.load_all().await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Transport {
            operation: SyncOperation::Load,
            ..
        }
    ));
}
