use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::course::CourseId;
use crate::history::{History, HistoryEntry};
use crate::route::{self, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushOptions {
    pub suppress_scroll: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub path: String,
    pub options: PushOptions,
}

/// Result of applying queued navigations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChange {
    pub route: Route,
    pub reset_scroll: bool,
}

/// Selection and enrollment actions as seen by the views.
///
/// Both queue a navigation and return immediately; the URL change is picked
/// up by the owner of the [`Navigator`] on its next turn.
pub trait NavigationBridge {
    fn select(&mut self, id: &CourseId);
    fn enroll(&mut self, id: &CourseId);
}

/// Address bar state: current location, history and queued pushes.
pub struct Navigator {
    history: History,
    pending: VecDeque<PendingNavigation>,
}

impl Navigator {
    pub fn new(initial_path: &str) -> Self {
        let mut history = History::new();
        let route = parse_or_not_found(initial_path);
        history.add(route.to_path(), route.title().to_string());
        Self {
            history,
            pending: VecDeque::new(),
        }
    }

    pub fn current_path(&self) -> &str {
        self.history.current().map_or("/", |e| e.path.as_str())
    }

    pub fn current_route(&self) -> Route {
        parse_or_not_found(self.current_path())
    }

    pub fn read_param(&self, name: &str) -> Option<String> {
        route::read_param(self.current_path(), name)
    }

    /// The `id` query parameter of the current location, if any.
    pub fn url_id(&self) -> Option<CourseId> {
        self.read_param("id")
            .filter(|id| !id.is_empty())
            .map(CourseId::new)
    }

    pub fn push_url(&mut self, path: impl Into<String>, options: PushOptions) {
        let path = path.into();
        debug!(%path, suppress_scroll = options.suppress_scroll, "navigation queued");
        self.pending.push_back(PendingNavigation { path, options });
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Applies queued pushes to the history. Returns the final location when
    /// at least one push changed it.
    pub fn commit(&mut self) -> Option<LocationChange> {
        let mut change = None;

        while let Some(PendingNavigation { path, options }) = self.pending.pop_front() {
            let route = parse_or_not_found(&path);
            let canonical = route.to_path();
            if canonical == self.current_path() {
                continue;
            }

            info!(path = %canonical, "navigated");
            self.history.add(canonical, route.title().to_string());
            let reset_scroll = !options.suppress_scroll
                || change
                    .as_ref()
                    .map_or(false, |c: &LocationChange| c.reset_scroll);
            change = Some(LocationChange {
                route,
                reset_scroll,
            });
        }

        change
    }

    pub fn back(&mut self) -> Option<Route> {
        self.pending.clear();
        let path = self.history.go_back()?.path.clone();
        Some(parse_or_not_found(&path))
    }

    pub fn forward(&mut self) -> Option<Route> {
        self.pending.clear();
        let path = self.history.go_forward()?.path.clone();
        Some(parse_or_not_found(&path))
    }

    pub fn history(&self) -> (Vec<HistoryEntry>, Option<usize>) {
        let entries = self.history.list().into_iter().cloned().collect();
        (entries, self.history.current_index())
    }
}

impl NavigationBridge for Navigator {
    fn select(&mut self, id: &CourseId) {
        self.push_url(
            Route::search(Some(id.clone())).to_path(),
            PushOptions {
                suppress_scroll: true,
            },
        );
    }

    fn enroll(&mut self, id: &CourseId) {
        self.push_url(
            Route::checkout(id.clone()).to_path(),
            PushOptions {
                suppress_scroll: true,
            },
        );
    }
}

fn parse_or_not_found(path: &str) -> Route {
    Route::parse(path).unwrap_or_else(|e| {
        warn!(%path, error = %e, "unparsable path");
        Route::NotFound {
            path: path.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_round_trips_through_url() {
        let mut nav = Navigator::new("/search");
        nav.select(&CourseId::new("c"));
        assert!(nav.has_pending());
        assert_eq!(nav.url_id(), None, "navigation is applied on commit");

        let change = nav.commit().unwrap();
        assert_eq!(change.route, Route::search(Some(CourseId::new("c"))));
        assert!(!change.reset_scroll);
        assert_eq!(nav.read_param("id").as_deref(), Some("c"));
    }

    #[test]
    fn enroll_pushes_checkout_handoff() {
        let mut nav = Navigator::new("/search?id=b");
        nav.enroll(&CourseId::new("b"));
        nav.commit();
        assert_eq!(nav.current_path(), "/checkout?step=1&id=b&showSignUp=false");
        assert_eq!(nav.read_param("step").as_deref(), Some("1"));
        assert_eq!(nav.read_param("showSignUp").as_deref(), Some("false"));
    }

    #[test]
    fn pushing_current_location_is_not_a_change() {
        let mut nav = Navigator::new("/search?id=a");
        nav.select(&CourseId::new("a"));
        assert_eq!(nav.commit(), None);
        assert_eq!(nav.history().0.len(), 1);
    }

    #[test]
    fn plain_push_requests_scroll_reset() {
        let mut nav = Navigator::new("/");
        nav.push_url("/search", PushOptions::default());
        assert!(nav.commit().unwrap().reset_scroll);
    }

    #[test]
    fn back_restores_previous_selection_url() {
        let mut nav = Navigator::new("/search?id=a");
        nav.select(&CourseId::new("b"));
        nav.commit();
        assert_eq!(
            nav.back(),
            Some(Route::search(Some(CourseId::new("a"))))
        );
        assert_eq!(nav.url_id(), Some(CourseId::new("a")));
        assert_eq!(
            nav.forward(),
            Some(Route::search(Some(CourseId::new("b"))))
        );
    }
}
