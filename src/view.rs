//! State a front-end keeps per screen: the rows it shows and an optional
//! dismissible notice. Failures never propagate into rendering; lists are
//! reset to empty, the dashboard keeps its last good snapshot.

use tracing::{error, warn};

use crate::{
    dashboard::Freshness,
    error::ApiError,
    model::{DashboardStats, Listing, PageMeta},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn from_error(err: &ApiError, fallback: &str) -> Self {
        Self {
            message: err.user_message(fallback),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    meta: Option<PageMeta>,
    notice: Option<Notice>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
            notice: None,
        }
    }
}

impl<T> ListView<T> {
    /// Apply the outcome of a list call. `fallback` is the message shown
    /// for failures that carry no server detail.
    pub fn apply(&mut self, result: Result<Listing<T>, ApiError>, fallback: &str) {
        match result {
            Ok(listing) => {
                self.items = listing.items;
                self.meta = listing.meta;
                self.notice = None;
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                match &e {
                    ApiError::InvalidResponseShape { .. } => warn!(error = %e, "Showing empty list"),
                    _ => error!(error = %e, "{fallback}"),
                }
                self.items.clear();
                self.meta = None;
                self.notice = Some(Notice::from_error(&e, fallback));
            }
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    /// Record a failure of an action on this screen (create, delete)
    /// without touching the rows.
    pub fn report(&mut self, err: &ApiError, fallback: &str) {
        if !err.is_cancelled() {
            self.notice = Some(Notice::from_error(err, fallback));
        }
    }
}

/// Dashboard screen state; keeps the last good snapshot across failures.
#[derive(Debug, Clone, Default)]
pub struct StatsView {
    stats: Option<DashboardStats>,
    notice: Option<Notice>,
}

pub const STATS_FALLBACK: &str = "Failed to fetch dashboard stats";

impl StatsView {
    pub fn apply(&mut self, result: Result<Freshness, ApiError>) {
        match result {
            Ok(freshness) => {
                if let Some(stats) = freshness.stats() {
                    self.stats = Some(stats);
                    self.notice = None;
                }
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => self.notice = Some(Notice::from_error(&e, STATS_FALLBACK)),
        }
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_FORMAT_MESSAGE;

    fn listing(items: Vec<u32>) -> Result<Listing<u32>, ApiError> {
        Ok(Listing { items, meta: None })
    }

    #[test]
    fn invalid_shape_resets_list_and_shows_generic_notice() {
        let mut view = ListView::default();
        view.apply(listing(vec![1, 2, 3]), "Failed to fetch employees");

        view.apply(
            Err(ApiError::InvalidResponseShape {
                expected: "array",
                found: "string".into(),
            }),
            "Failed to fetch employees",
        );

        assert!(view.items().is_empty());
        assert_eq!(view.notice().unwrap().message, INVALID_FORMAT_MESSAGE);

        view.dismiss();
        assert!(view.notice().is_none());
    }

    #[test]
    fn cancellation_leaves_list_untouched() {
        let mut view = ListView::default();
        view.apply(listing(vec![7]), "x");
        view.apply(Err(ApiError::Cancelled), "x");

        assert_eq!(view.items(), &[7]);
        assert!(view.notice().is_none());
    }

    #[test]
    fn transport_failure_uses_fallback() {
        let mut view: ListView<u32> = ListView::default();
        view.apply(
            Err(ApiError::Transport {
                status: None,
                message: "connection refused".into(),
                detail: None,
            }),
            "Failed to fetch attendance",
        );
        assert_eq!(view.notice().unwrap().message, "Failed to fetch attendance");
    }

    #[test]
    fn action_failure_keeps_rows_and_shows_detail() {
        let mut view = ListView::default();
        view.apply(listing(vec![1]), "x");
        view.report(
            &ApiError::ValidationRejected {
                status: 400,
                detail: "Employee with ID 'EMP001' already exists".into(),
            },
            "Failed to add employee",
        );

        assert_eq!(view.items(), &[1]);
        assert_eq!(
            view.notice().unwrap().message,
            "Employee with ID 'EMP001' already exists"
        );
    }

    #[test]
    fn stats_survive_a_failed_refresh() {
        let stats = DashboardStats {
            total_employees: 3,
            ..DashboardStats::default()
        };
        let mut view = StatsView::default();
        view.apply(Ok(Freshness::Fetched(stats)));
        view.apply(Err(ApiError::Transport {
            status: Some(502),
            message: "bad gateway".into(),
            detail: None,
        }));

        assert_eq!(view.stats(), Some(&stats));
        assert_eq!(view.notice().unwrap().message, STATS_FALLBACK);

        view.apply(Ok(Freshness::InFlight));
        assert_eq!(view.stats(), Some(&stats));
    }
}
