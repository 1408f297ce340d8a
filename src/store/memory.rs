//! In-process [`ProfileStore`] with call accounting and fault injection.
//!
//! Every operation counts a start before it does any work and a finish once
//! it has produced its result. Stores built with
//! [`MemoryStore::with_event_log`] additionally keep the ordered
//! `Started`/`Finished` log so callers can assert interleavings. Individual
//! operations can be made to fail or to sleep before answering.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::time::Duration;

use crate::store::{PostRecord, ProfileStore, StoreError, StoreResult, UserRecord};

/// Operations exposed by the store, used to address counters and faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FetchUser,
    FetchTrending,
    RecordLastLogin,
    FetchUserPosts,
    Ping,
}

impl StoreOp {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            StoreOp::FetchUser => 0,
            StoreOp::FetchTrending => 1,
            StoreOp::RecordLastLogin => 2,
            StoreOp::FetchUserPosts => 3,
            StoreOp::Ping => 4,
        }
    }
}

/// Entry in the store's operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Started(StoreOp),
    Finished(StoreOp),
}

#[derive(Debug, Clone)]
struct StoredPost {
    user_id: i32,
    record: PostRecord,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, UserRecord>,
    posts: DashMap<i32, StoredPost>,
    next_user_id: AtomicI32,
    next_post_id: AtomicI32,
    faults: DashMap<StoreOp, String>,
    delays: DashMap<StoreOp, Duration>,
    started: [AtomicUsize; StoreOp::COUNT],
    finished: [AtomicUsize; StoreOp::COUNT],
    events: Option<Mutex<Vec<StoreEvent>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that also records every `Started`/`Finished` event in order.
    /// The log is never trimmed; meant for tests.
    pub fn with_event_log() -> Self {
        Self {
            events: Some(Mutex::new(Vec::new())),
            ..Self::default()
        }
    }

    /// Insert a user and return its id.
    pub fn insert_user(&self, username: &str, email: &str, settings: serde_json::Value) -> i32 {
        let id = self.next_user_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.users.insert(
            email.to_string(),
            UserRecord {
                id,
                username: username.to_string(),
                email: email.to_string(),
                created_at: Utc::now().naive_utc(),
                last_login: None,
                settings,
            },
        );
        id
    }

    /// Insert a post owned by `user_id` and return its id.
    pub fn insert_post(
        &self,
        user_id: i32,
        title: &str,
        content: &str,
        views: i32,
        created_at: NaiveDateTime,
    ) -> i32 {
        let id = self.next_post_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.posts.insert(
            id,
            StoredPost {
                user_id,
                record: PostRecord {
                    id,
                    title: title.to_string(),
                    content: content.to_string(),
                    views,
                    created_at,
                },
            },
        );
        id
    }

    /// Make every subsequent call of `op` fail with `message`.
    pub fn fail(&self, op: StoreOp, message: &str) {
        self.faults.insert(op, message.to_string());
    }

    /// Clear an injected failure.
    pub fn heal(&self, op: StoreOp) {
        self.faults.remove(&op);
    }

    /// Make every subsequent call of `op` sleep before answering.
    pub fn delay(&self, op: StoreOp, duration: Duration) {
        self.delays.insert(op, duration);
    }

    /// Number of times `op` was invoked.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.started[op.index()].load(Ordering::SeqCst)
    }

    /// Number of times `op` ran to completion (successfully or not).
    pub fn completions(&self, op: StoreOp) -> usize {
        self.finished[op.index()].load(Ordering::SeqCst)
    }

    /// Snapshot of the operation log, in the order events happened. Empty
    /// unless the store was built with [`MemoryStore::with_event_log`].
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .as_ref()
            .map(|events| events.lock().clone())
            .unwrap_or_default()
    }

    /// Current `last_login` of the user with the given email.
    pub fn last_login_of(&self, email: &str) -> Option<NaiveDateTime> {
        self.users.get(email).and_then(|u| u.last_login)
    }

    fn log(&self, event: StoreEvent) {
        if let Some(events) = &self.events {
            events.lock().push(event);
        }
    }

    async fn enter(&self, op: StoreOp) -> StoreResult<()> {
        self.started[op.index()].fetch_add(1, Ordering::SeqCst);
        self.log(StoreEvent::Started(op));

        let delay = self.delays.get(&op).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fault = self.faults.get(&op).map(|m| m.clone());
        match fault {
            Some(message) => {
                self.finish(op);
                Err(StoreError::Unavailable(message))
            }
            None => Ok(()),
        }
    }

    fn finish(&self, op: StoreOp) {
        self.finished[op.index()].fetch_add(1, Ordering::SeqCst);
        self.log(StoreEvent::Finished(op));
    }

    fn sorted_posts<F, K>(&self, filter: F, key: K, limit: i64) -> Vec<PostRecord>
    where
        F: Fn(&StoredPost) -> bool,
        K: Fn(&PostRecord, &PostRecord) -> std::cmp::Ordering,
    {
        let mut posts: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|p| filter(p.value()))
            .map(|p| p.record.clone())
            .collect();
        posts.sort_by(|a, b| key(a, b));
        posts.truncate(usize::try_from(limit).unwrap_or(0));
        posts
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn fetch_user(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        self.enter(StoreOp::FetchUser).await?;
        let user = self.users.get(email).map(|u| u.clone());
        self.finish(StoreOp::FetchUser);
        Ok(user)
    }

    async fn fetch_trending(&self, limit: i64) -> StoreResult<Vec<PostRecord>> {
        self.enter(StoreOp::FetchTrending).await?;
        let posts = self.sorted_posts(|_| true, |a, b| b.views.cmp(&a.views), limit);
        self.finish(StoreOp::FetchTrending);
        Ok(posts)
    }

    async fn record_last_login(&self, user_id: i32) -> StoreResult<Option<NaiveDateTime>> {
        self.enter(StoreOp::RecordLastLogin).await?;
        let now = Utc::now().naive_utc();
        let updated = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .map(|mut u| {
                u.last_login = Some(now);
                u.last_login
            });
        self.finish(StoreOp::RecordLastLogin);
        updated.ok_or_else(|| StoreError::Unavailable(format!("no user with id {user_id}")))
    }

    async fn fetch_user_posts(&self, user_id: i32, limit: i64) -> StoreResult<Vec<PostRecord>> {
        self.enter(StoreOp::FetchUserPosts).await?;
        let posts = self.sorted_posts(
            |p| p.user_id == user_id,
            |a, b| b.created_at.cmp(&a.created_at),
            limit,
        );
        self.finish(StoreOp::FetchUserPosts);
        Ok(posts)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.enter(StoreOp::Ping).await?;
        self.finish(StoreOp::Ping);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn test_trending_orders_by_views() {
        let store = MemoryStore::new();
        let id = store.insert_user("ann", "ann@example.com", serde_json::json!({}));
        let now = Utc::now().naive_utc();
        store.insert_post(id, "low", "", 1, now);
        store.insert_post(id, "high", "", 100, now);
        store.insert_post(id, "mid", "", 50, now);

        let trending = store.fetch_trending(2).await.unwrap();
        let titles: Vec<_> = trending.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid"]);
    }

    #[tokio::test]
    async fn test_user_posts_newest_first() {
        let store = MemoryStore::new();
        let ann = store.insert_user("ann", "ann@example.com", serde_json::json!({}));
        let bob = store.insert_user("bob", "bob@example.com", serde_json::json!({}));
        let now = Utc::now().naive_utc();
        store.insert_post(ann, "old", "", 0, now - ChronoDuration::hours(2));
        store.insert_post(ann, "new", "", 0, now);
        store.insert_post(bob, "other", "", 0, now);

        let posts = store.fetch_user_posts(ann, 10).await.unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_fault_injection_and_accounting() {
        let store = MemoryStore::new();
        store.fail(StoreOp::Ping, "down");

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert_eq!(store.calls(StoreOp::Ping), 1);
        assert_eq!(store.completions(StoreOp::Ping), 1);

        store.heal(StoreOp::Ping);
        assert!(store.ping().await.is_ok());
        assert_eq!(store.calls(StoreOp::Ping), 2);
    }

    #[tokio::test]
    async fn test_default_store_keeps_counters_but_no_log() {
        let store = MemoryStore::new();
        for _ in 0..1000 {
            store.fetch_user("ann@example.com").await.unwrap();
            store.ping().await.unwrap();
        }

        assert_eq!(store.calls(StoreOp::FetchUser), 1000);
        assert_eq!(store.completions(StoreOp::Ping), 1000);
        assert_eq!(store.calls(StoreOp::FetchTrending), 0);
        assert!(store.events().is_empty());
    }

    #[tokio::test]
    async fn test_event_log_records_order() {
        let store = MemoryStore::with_event_log();
        store.ping().await.unwrap();
        store.fetch_trending(1).await.unwrap();

        assert_eq!(
            store.events(),
            vec![
                StoreEvent::Started(StoreOp::Ping),
                StoreEvent::Finished(StoreOp::Ping),
                StoreEvent::Started(StoreOp::FetchTrending),
                StoreEvent::Finished(StoreOp::FetchTrending),
            ]
        );
    }

    #[tokio::test]
    async fn test_record_last_login_updates_user() {
        let store = MemoryStore::new();
        let id = store.insert_user("ann", "ann@example.com", serde_json::json!({}));
        assert!(store.last_login_of("ann@example.com").is_none());

        let stamped = store.record_last_login(id).await.unwrap();
        assert!(stamped.is_some());
        assert_eq!(store.last_login_of("ann@example.com"), stamped);

        assert!(store.record_last_login(999).await.is_err());
    }
}
