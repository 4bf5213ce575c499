use tracing::debug;

use crate::catalog::{Catalog, FetchState};
use crate::course::{Course, CourseId};
use crate::navigation::NavigationBridge;
use crate::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Error,
    Ready,
}

/// Search page: full course list with a synchronized detail pane.
#[derive(Debug, Default)]
pub struct DiscoveryView {
    selection: SelectionState,
    cursor: usize,
}

impl DiscoveryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(catalog: &Catalog) -> ViewStatus {
        match catalog.state() {
            FetchState::Loading => ViewStatus::Loading,
            FetchState::Failed(_) => ViewStatus::Error,
            FetchState::Ready(_) => ViewStatus::Ready,
        }
    }

    /// Re-derives the selection from the current snapshot and URL id. Cheap
    /// to call on every turn; the cursor only follows the selection when it
    /// was actually recomputed, so keyboard movement survives a no-op sync.
    pub fn sync(&mut self, catalog: &Catalog, url_id: Option<&CourseId>) {
        let Some(courses) = catalog.courses() else {
            return;
        };
        let recomputed = self.selection.resync(catalog.generation(), courses, url_id);
        let target = self
            .selection
            .selected()
            .and_then(|id| position(courses, id));
        match target {
            Some(index) if recomputed => self.cursor = index,
            _ => self.cursor = self.cursor.min(courses.len().saturating_sub(1)),
        }
    }

    pub fn selected_id(&self) -> Option<&CourseId> {
        self.selection.selected()
    }

    pub fn detail<'a>(&self, catalog: &'a Catalog) -> Option<&'a Course> {
        let courses = catalog.courses()?;
        let id = self.selection.selected()?;
        courses.iter().find(|c| &c.course_id == id)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, catalog: &Catalog) {
        let len = catalog.courses().map_or(0, |c| c.len());
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// List item click. Ignored outside `Ready` or for an out-of-range index.
    pub fn click(&mut self, catalog: &Catalog, index: usize, bridge: &mut impl NavigationBridge) {
        let Some(course) = catalog.courses().and_then(|c| c.get(index)) else {
            return;
        };
        debug!(course_id = %course.course_id, "course selected");
        self.cursor = index;
        self.selection.set(course.course_id.clone());
        bridge.select(&course.course_id);
    }

    pub fn click_cursor(&mut self, catalog: &Catalog, bridge: &mut impl NavigationBridge) {
        self.click(catalog, self.cursor, bridge);
    }

    /// Enrollment action in the detail pane.
    pub fn enroll(&self, catalog: &Catalog, bridge: &mut impl NavigationBridge) {
        if let Some(course) = self.detail(catalog) {
            debug!(course_id = %course.course_id, "enroll requested");
            bridge.enroll(&course.course_id);
        }
    }

    /// Forgets the selection, e.g. when the page is remounted.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.cursor = 0;
    }
}

fn position(courses: &[Course], id: &CourseId) -> Option<usize> {
    courses.iter().position(|c| &c.course_id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBridge {
        selected: Vec<CourseId>,
        enrolled: Vec<CourseId>,
    }

    impl NavigationBridge for RecordingBridge {
        fn select(&mut self, id: &CourseId) {
            self.selected.push(id.clone());
        }

        fn enroll(&mut self, id: &CourseId) {
            self.enrolled.push(id.clone());
        }
    }

    fn ready(ids: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        let request = catalog.begin_fetch();
        catalog.resolve(
            request,
            Ok(ids.iter().map(|id| Course::new(*id, *id)).collect()),
        );
        catalog
    }

    #[test]
    fn loading_catalog_ignores_clicks() {
        let catalog = Catalog::new();
        let mut view = DiscoveryView::new();
        let mut bridge = RecordingBridge::default();

        assert_eq!(DiscoveryView::status(&catalog), ViewStatus::Loading);
        view.sync(&catalog, None);
        view.click(&catalog, 0, &mut bridge);
        view.enroll(&catalog, &mut bridge);

        assert!(bridge.selected.is_empty());
        assert!(bridge.enrolled.is_empty());
        assert!(view.selected_id().is_none());
    }

    #[test]
    fn empty_catalog_has_no_detail_pane() {
        let catalog = ready(&[]);
        let mut view = DiscoveryView::new();
        view.sync(&catalog, None);

        assert_eq!(DiscoveryView::status(&catalog), ViewStatus::Ready);
        assert!(view.detail(&catalog).is_none());

        let mut bridge = RecordingBridge::default();
        view.click_cursor(&catalog, &mut bridge);
        assert!(bridge.selected.is_empty());
    }

    #[test]
    fn click_selects_and_forwards_to_bridge() {
        let catalog = ready(&["a", "b", "c"]);
        let mut view = DiscoveryView::new();
        let mut bridge = RecordingBridge::default();
        view.sync(&catalog, None);

        view.click(&catalog, 2, &mut bridge);
        assert_eq!(bridge.selected, vec![CourseId::new("c")]);
        assert_eq!(view.detail(&catalog).unwrap().course_id.as_str(), "c");
        assert_eq!(view.cursor(), 2);
    }

    #[test]
    fn cursor_movement_survives_unchanged_sync() {
        let catalog = ready(&["a", "b", "c"]);
        let mut view = DiscoveryView::new();
        let mut bridge = RecordingBridge::default();
        view.sync(&catalog, None);
        assert_eq!(view.cursor(), 0);

        view.cursor_down(&catalog);
        view.sync(&catalog, None);
        view.cursor_down(&catalog);
        view.sync(&catalog, None);
        assert_eq!(view.cursor(), 2);
        assert_eq!(view.selected_id(), Some(&CourseId::new("a")));

        view.click_cursor(&catalog, &mut bridge);
        assert_eq!(bridge.selected, vec![CourseId::new("c")]);

        // The URL catching up re-derives the same course.
        view.sync(&catalog, Some(&CourseId::new("c")));
        assert_eq!(view.cursor(), 2);
        assert_eq!(view.selected_id(), Some(&CourseId::new("c")));
    }

    #[test]
    fn url_change_moves_cursor_to_new_selection() {
        let catalog = ready(&["a", "b", "c"]);
        let mut view = DiscoveryView::new();
        view.sync(&catalog, Some(&CourseId::new("c")));
        view.cursor_up();
        view.sync(&catalog, Some(&CourseId::new("c")));
        assert_eq!(view.cursor(), 1);

        view.sync(&catalog, Some(&CourseId::new("a")));
        assert_eq!(view.cursor(), 0);
    }

    #[test]
    fn enroll_uses_detail_pane_course() {
        let catalog = ready(&["a", "b", "c"]);
        let mut view = DiscoveryView::new();
        let mut bridge = RecordingBridge::default();
        view.sync(&catalog, Some(&CourseId::new("b")));

        view.enroll(&catalog, &mut bridge);
        assert_eq!(bridge.enrolled, vec![CourseId::new("b")]);
    }

    #[test]
    fn sync_moves_cursor_to_selection() {
        let catalog = ready(&["a", "b", "c"]);
        let mut view = DiscoveryView::new();
        view.sync(&catalog, Some(&CourseId::new("c")));
        assert_eq!(view.cursor(), 2);

        view.cursor_up();
        view.cursor_up();
        view.cursor_up();
        assert_eq!(view.cursor(), 0);
        view.cursor_down(&catalog);
        assert_eq!(view.cursor(), 1);
    }
}
