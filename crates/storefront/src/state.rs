//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::{ContentError, EbookStore};
use crate::services::{AccessPolicy, SubmissionGuard};
use crate::upstream::{ApiError, UpstreamClient};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("upstream client: {0}")]
    Upstream(#[from] ApiError),
    #[error("e-book content: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    upstream: UpstreamClient,
    ebook: EbookStore,
    ebook_policy: AccessPolicy,
    submissions: SubmissionGuard,
}

impl AppState {
    /// Build state from configuration, loading e-book chapters from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be built or the
    /// chapter directory cannot be read.
    pub fn new(config: SiteConfig, pool: PgPool) -> Result<Self, StateError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let ebook = EbookStore::load(&config.ebook.content_dir)?;
        let ebook_policy = AccessPolicy::new(config.admin_email.clone(), config.ebook.product);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                upstream,
                ebook,
                ebook_policy,
                submissions: SubmissionGuard::new(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Session database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn upstream(&self) -> &UpstreamClient {
        &self.inner.upstream
    }

    #[must_use]
    pub fn ebook(&self) -> &EbookStore {
        &self.inner.ebook
    }

    /// Access policy for the gated e-book.
    #[must_use]
    pub fn ebook_policy(&self) -> &AccessPolicy {
        &self.inner.ebook_policy
    }

    /// Recently accepted consultation submission IDs.
    #[must_use]
    pub fn submissions(&self) -> &SubmissionGuard {
        &self.inner.submissions
    }
}
