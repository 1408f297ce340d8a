//! Two-phase user profile workflow.
//!
//! ```text
//! lookup:  fetch_user(email) ║ fetch_trending(limit)
//!          ─── barrier ───  (subject id now known)
//! refresh: record_last_login(id) ║ fetch_user_posts(id, limit)
//!          ─── barrier ───
//! assemble UserProfile
//! ```
//!
//! Any lookup failure aborts before the refresh phase issues a single call.
//! Nothing is retried here.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ProfileConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::observability::metrics;
use crate::orchestrator::phase::{join_phase, Phase};
use crate::orchestrator::types::UserProfile;
use crate::store::ProfileStore;

/// Drives the profile workflow against a shared store handle.
#[derive(Clone)]
pub struct ProfileOrchestrator {
    store: Arc<dyn ProfileStore>,
    config: ProfileConfig,
}

impl ProfileOrchestrator {
    pub fn new(store: Arc<dyn ProfileStore>, config: ProfileConfig) -> Self {
        Self { store, config }
    }

    /// Build the composite profile for the user identified by `email`.
    ///
    /// Exactly one `record_last_login` write is issued per successful call.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if no user has this email. The refresh
    ///   phase is never started.
    /// - [`ServiceError::Store`] if any store operation in either phase
    ///   fails. A missing subject is reported in preference to a failed
    ///   trending read.
    pub async fn user_profile(&self, email: &str) -> ServiceResult<UserProfile> {
        let start = Instant::now();
        let result = self.run(email).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(ServiceError::NotFound(_)) => "not_found",
            Err(_) => "error",
        };
        metrics::record_orchestration(outcome, start);

        result
    }

    async fn run(&self, email: &str) -> ServiceResult<UserProfile> {
        let store = self.store.as_ref();

        let (user, trending) = join_phase(
            Phase::Lookup,
            store.fetch_user(email),
            store.fetch_trending(self.config.trending_limit),
        )
        .await;

        let user = match user {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(email = %email, "User not found");
                return Err(ServiceError::NotFound("user"));
            }
            Err(e) => {
                tracing::warn!(phase = %Phase::Lookup, op = "fetch_user", error = %e, "Aborting profile");
                return Err(e.into());
            }
        };
        let trending = trending.map_err(|e| {
            tracing::warn!(phase = %Phase::Lookup, op = "fetch_trending", error = %e, "Aborting profile");
            ServiceError::from(e)
        })?;

        let (last_login, posts) = join_phase(
            Phase::Refresh,
            store.record_last_login(user.id),
            store.fetch_user_posts(user.id, self.config.posts_limit),
        )
        .await;

        let last_login = last_login.map_err(|e| {
            tracing::warn!(phase = %Phase::Refresh, op = "record_last_login", user_id = user.id, error = %e, "Aborting profile");
            ServiceError::from(e)
        })?;
        let posts = posts.map_err(|e| {
            tracing::warn!(phase = %Phase::Refresh, op = "fetch_user_posts", user_id = user.id, error = %e, "Aborting profile");
            ServiceError::from(e)
        })?;

        Ok(UserProfile::assemble(user, last_login, posts, trending))
    }
}
