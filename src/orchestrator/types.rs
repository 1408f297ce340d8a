//! Composite result of the user profile workflow.

use chrono::{NaiveDateTime, SecondsFormat};
use serde::Serialize;

use crate::store::{PostRecord, UserRecord};

/// A post as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub views: i32,
    pub created_at: String,
}

impl From<PostRecord> for PostView {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            views: post.views,
            created_at: format_timestamp(post.created_at),
        }
    }
}

/// Subject fields merged with both collections.
///
/// `posts` and `trending` are plain vectors so an empty read always
/// serializes as `[]`, never `null` or a missing key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub last_login: Option<String>,
    pub settings: serde_json::Value,
    pub posts: Vec<PostView>,
    pub trending: Vec<PostView>,
}

impl UserProfile {
    /// Merge phase outputs. `last_login` is the value returned by the
    /// refresh write; the one read in the lookup phase is discarded.
    pub fn assemble(
        user: UserRecord,
        last_login: Option<NaiveDateTime>,
        posts: Vec<PostRecord>,
        trending: Vec<PostRecord>,
    ) -> Self {
        Self {
            username: user.username,
            email: user.email,
            created_at: format_timestamp(user.created_at),
            last_login: last_login.map(format_timestamp),
            settings: user.settings,
            posts: posts.into_iter().map(PostView::from).collect(),
            trending: trending.into_iter().map(PostView::from).collect(),
        }
    }
}

/// RFC 3339, UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}
