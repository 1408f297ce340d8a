//! End-to-end tests for `GET /db/user-profile/{email}` and `GET /health`.

use bench_orchestrator::store::StoreOp;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_profile_success() {
    let server = common::start_server(common::seeded_store()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/db/user-profile/ann@example.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["username"], "ann");
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["settings"]["theme"], "dark");
    assert!(body["lastLogin"].as_str().unwrap().ends_with('Z'));

    let posts: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(posts, vec!["second", "first"]);
    assert_eq!(body["trending"][0]["title"], "viral");
    assert_eq!(body["trending"][0]["views"], 1000);

    assert_eq!(server.store.calls(StoreOp::RecordLastLogin), 1);
    assert!(server.store.last_login_of("ann@example.com").is_some());
}

#[tokio::test]
async fn test_profile_not_found() {
    let server = common::start_server(common::seeded_store()).await;

    let res = reqwest::get(server.url("/db/user-profile/ghost@example.com"))
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "User not found"}));
    assert_eq!(server.store.calls(StoreOp::RecordLastLogin), 0);
    assert_eq!(server.store.calls(StoreOp::FetchUserPosts), 0);
}

#[tokio::test]
async fn test_profile_store_failure() {
    let server = common::start_server(common::seeded_store()).await;
    server.store.fail(StoreOp::FetchTrending, "connection refused");

    let res = reqwest::get(server.url("/db/user-profile/ann@example.com"))
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "Internal Server Error"}));
    assert_eq!(server.store.calls(StoreOp::RecordLastLogin), 0);

    server.store.heal(StoreOp::FetchTrending);
    let res = reqwest::get(server.url("/db/user-profile/ann@example.com"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_profile_without_rows_has_empty_arrays() {
    let store = std::sync::Arc::new(bench_orchestrator::store::MemoryStore::new());
    store.insert_user("solo", "solo@example.com", serde_json::json!({}));
    let server = common::start_server(store).await;

    let res = reqwest::get(server.url("/db/user-profile/solo@example.com"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["posts"], serde_json::json!([]));
    assert_eq!(body["trending"], serde_json::json!([]));
}

#[tokio::test]
async fn test_request_id_echoed_or_generated() {
    let server = common::start_server(common::seeded_store()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/health"))
        .header("x-request-id", "trace-abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-abc-123");

    let res = client.get(server.url("/health")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_health() {
    let server = common::start_server(common::seeded_store()).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OK");

    server.store.fail(StoreOp::Ping, "down");
    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "Database Error");
}

#[tokio::test]
async fn test_concurrent_profiles_each_refresh_once() {
    let server = common::start_server(common::seeded_store()).await;
    let client = reqwest::Client::new();

    let requests = (0..20).map(|i| {
        let email = if i % 2 == 0 { "ann@example.com" } else { "bob@example.com" };
        client.get(server.url(&format!("/db/user-profile/{email}"))).send()
    });
    let responses = futures_util::future::join_all(requests).await;

    for res in responses {
        assert_eq!(res.unwrap().status(), 200);
    }
    assert_eq!(server.store.calls(StoreOp::RecordLastLogin), 20);
    assert_eq!(server.store.calls(StoreOp::FetchUserPosts), 20);
}
