//! Shared utilities for integration tests.

use chrono::{Duration as ChronoDuration, NaiveDateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use bench_orchestrator::config::ServiceConfig;
use bench_orchestrator::lifecycle::Shutdown;
use bench_orchestrator::store::MemoryStore;
use bench_orchestrator::HttpServer;

/// A running server plus the handles a test needs to drive and stop it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Boot the real server on an ephemeral port over `store`.
pub async fn start_server(store: Arc<MemoryStore>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(ServiceConfig::default(), store.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, store, shutdown }
}

/// Store with two users and a handful of posts:
/// - `ann@example.com`: two posts, settings `{"theme": "dark"}`
/// - `bob@example.com`: one highly viewed post
/// - `solo@example.com`: no posts
#[allow(dead_code)]
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let ann = store.insert_user("ann", "ann@example.com", serde_json::json!({"theme": "dark"}));
    let bob = store.insert_user("bob", "bob@example.com", serde_json::json!({}));
    store.insert_user("solo", "solo@example.com", serde_json::json!({}));

    let now = Utc::now().naive_utc();
    store.insert_post(ann, "first", "hello", 4, minutes_ago(now, 30));
    store.insert_post(ann, "second", "again", 12, minutes_ago(now, 5));
    store.insert_post(bob, "viral", "wow", 1000, minutes_ago(now, 60));
    store
}

fn minutes_ago(now: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    now - ChronoDuration::minutes(minutes)
}
