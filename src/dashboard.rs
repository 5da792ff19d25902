//! Freshness-gated fetching of the dashboard statistics.
//!
//! A [`FetchController`] owns the last successful snapshot, the time it was
//! fetched, and at most one in-flight request. Repeated calls inside the
//! freshness window are served from the snapshot, concurrent calls while a
//! request is outstanding are no-ops, and cancelled requests never touch
//! the snapshot.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{error::ApiError, model::DashboardStats};

pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Where the controller gets its statistics from.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_stats(&self, cancel: &CancellationToken) -> Result<DashboardStats, ApiError>;
}

/// What a call to the controller did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Served from the snapshot; no request was made.
    Cached(DashboardStats),
    /// A request was made and its result is now the snapshot.
    Fetched(DashboardStats),
    /// Another request was already outstanding. Its result lands in the
    /// snapshot when it settles.
    InFlight,
    /// The request was superseded or torn down. Nothing was applied.
    Cancelled,
}

impl Freshness {
    pub fn stats(&self) -> Option<DashboardStats> {
        match self {
            Freshness::Cached(stats) | Freshness::Fetched(stats) => Some(*stats),
            Freshness::InFlight | Freshness::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    stats: DashboardStats,
    fetched_at: Instant,
}

#[derive(Debug, Clone)]
struct RequestHandle {
    id: Uuid,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct ControllerState {
    last: Option<CacheEntry>,
    active: Option<RequestHandle>,
    fetching: bool,
}

pub struct FetchController<S> {
    source: S,
    window: Duration,
    /// Parent of every request token; cancelled on teardown.
    root: CancellationToken,
    state: Mutex<ControllerState>,
}

impl<S: StatsSource> FetchController<S> {
    pub fn new(source: S, window: Duration) -> Self {
        Self::with_parent(source, window, &CancellationToken::new())
    }

    /// Requests are also cancelled when `parent` is, e.g. on Ctrl-C.
    pub fn with_parent(source: S, window: Duration, parent: &CancellationToken) -> Self {
        Self {
            source,
            window,
            root: parent.child_token(),
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Make sure a fresh snapshot exists, fetching only when needed.
    ///
    /// Non-cancellation failures are returned as-is and leave both the
    /// snapshot and its fetch time untouched, so the next call retries.
    pub async fn ensure_fresh(&self) -> Result<Freshness, ApiError> {
        let handle = {
            let mut state = self.state.lock();
            if state.fetching {
                debug!("Dashboard stats request already in flight");
                return Ok(Freshness::InFlight);
            }

            if let Some(entry) = state.last {
                let age = entry.fetched_at.elapsed();
                if age < self.window {
                    debug!(age_secs = age.as_secs(), "Serving cached dashboard stats");
                    return Ok(Freshness::Cached(entry.stats));
                }
            }

            self.begin(&mut state)
        };

        self.settle(handle).await
    }

    /// Fetch regardless of the snapshot's age, superseding any outstanding
    /// request. Only this call's result is applied.
    pub async fn refresh(&self) -> Result<Freshness, ApiError> {
        let handle = self.begin(&mut self.state.lock());
        self.settle(handle).await
    }

    /// Cancel the outstanding request, if any. The pending call settles as
    /// [`Freshness::Cancelled`] and later calls do nothing.
    pub fn teardown(&self) {
        self.root.cancel();
        let mut state = self.state.lock();
        if let Some(handle) = state.active.take() {
            info!(request_id = %handle.id, "Tearing down in-flight dashboard stats request");
        }
        state.fetching = false;
    }

    /// Last successfully fetched statistics, regardless of age.
    pub fn snapshot(&self) -> Option<DashboardStats> {
        self.state.lock().last.map(|entry| entry.stats)
    }

    /// Time since the snapshot was fetched.
    pub fn age(&self) -> Option<Duration> {
        self.state.lock().last.map(|entry| entry.fetched_at.elapsed())
    }

    pub fn is_fetching(&self) -> bool {
        self.state.lock().fetching
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn begin(&self, state: &mut ControllerState) -> RequestHandle {
        if let Some(previous) = state.active.take() {
            info!(request_id = %previous.id, "Superseding in-flight dashboard stats request");
            previous.cancel.cancel();
        }

        let handle = RequestHandle {
            id: Uuid::new_v4(),
            cancel: self.root.child_token(),
        };
        debug!(request_id = %handle.id, "Fetching dashboard stats");
        state.active = Some(handle.clone());
        state.fetching = true;
        handle
    }

    async fn settle(&self, handle: RequestHandle) -> Result<Freshness, ApiError> {
        let result = if handle.cancel.is_cancelled() {
            Err(ApiError::Cancelled)
        } else {
            self.source.fetch_stats(&handle.cancel).await
        };

        let mut state = self.state.lock();
        let current = state
            .active
            .as_ref()
            .is_some_and(|active| active.id == handle.id);
        if current {
            state.active = None;
            state.fetching = false;
        }

        // A source may ignore the token, so it is checked again here.
        let cancelled = handle.cancel.is_cancelled() || !current;

        match result {
            Ok(stats) if !cancelled => {
                state.last = Some(CacheEntry {
                    stats,
                    fetched_at: Instant::now(),
                });
                info!(request_id = %handle.id, "Dashboard stats refreshed");
                Ok(Freshness::Fetched(stats))
            }
            Ok(_) => {
                info!(request_id = %handle.id, "Discarding result of cancelled stats request");
                Ok(Freshness::Cancelled)
            }
            Err(e) if cancelled || e.is_cancelled() => {
                info!(request_id = %handle.id, "Dashboard stats request cancelled");
                Ok(Freshness::Cancelled)
            }
            Err(e) => {
                error!(request_id = %handle.id, error = %e, "Failed to fetch dashboard stats");
                Err(e)
            }
        }
    }
}

impl<S> Drop for FetchController<S> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
