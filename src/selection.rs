use tracing::debug;

use crate::course::{Course, CourseId};

/// Resolves the selected course for a collection and an optional URL id.
///
/// An empty collection has no selection. A URL id that names a member wins;
/// anything else (absent or unknown id) falls back to the first course.
pub fn sync(courses: &[Course], url_id: Option<&CourseId>) -> Option<CourseId> {
    let first = courses.first()?;
    let matched = url_id.and_then(|id| courses.iter().find(|c| &c.course_id == id));
    Some(matched.unwrap_or(first).course_id.clone())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Inputs {
    generation: u64,
    url_id: Option<CourseId>,
}

/// Selection derived from (collection generation, URL id).
///
/// `observe` must be called whenever either input may have changed; it only
/// recomputes when one of them actually did.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<CourseId>,
    last_inputs: Option<Inputs>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        generation: u64,
        courses: &[Course],
        url_id: Option<&CourseId>,
    ) -> Option<&CourseId> {
        self.resync(generation, courses, url_id);
        self.selected.as_ref()
    }

    /// Same as [`observe`](Self::observe), but reports whether the selection
    /// was re-derived. `false` means a local override (if any) still stands.
    pub fn resync(
        &mut self,
        generation: u64,
        courses: &[Course],
        url_id: Option<&CourseId>,
    ) -> bool {
        let inputs = Inputs {
            generation,
            url_id: url_id.cloned(),
        };
        if self.last_inputs.as_ref() == Some(&inputs) {
            return false;
        }

        self.selected = sync(courses, url_id);
        debug!(
            generation,
            url_id = ?inputs.url_id,
            selected = ?self.selected,
            "selection re-synced"
        );
        self.last_inputs = Some(inputs);
        true
    }

    /// Optimistic local update ahead of the URL round trip.
    pub fn set(&mut self, id: CourseId) {
        self.selected = Some(id);
    }

    pub fn selected(&self) -> Option<&CourseId> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.last_inputs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses(ids: &[&str]) -> Vec<Course> {
        ids.iter().map(|id| Course::new(*id, id.to_uppercase())).collect()
    }

    fn id(s: &str) -> CourseId {
        CourseId::new(s)
    }

    #[test]
    fn absent_url_id_selects_first() {
        let c = courses(&["a", "b", "c"]);
        assert_eq!(sync(&c, None), Some(id("a")));
    }

    #[test]
    fn matching_url_id_is_selected() {
        let c = courses(&["a", "b", "c"]);
        assert_eq!(sync(&c, Some(&id("b"))), Some(id("b")));
    }

    #[test]
    fn unknown_url_id_falls_back_to_first() {
        let c = courses(&["a", "b", "c"]);
        assert_eq!(sync(&c, Some(&id("z"))), Some(id("a")));
    }

    #[test]
    fn empty_collection_has_no_selection() {
        assert_eq!(sync(&[], None), None);
        assert_eq!(sync(&[], Some(&id("a"))), None);
    }

    #[test]
    fn sync_is_deterministic() {
        let c = courses(&["x", "y", "z"]);
        for url in [None, Some(id("y")), Some(id("nope"))] {
            let first = sync(&c, url.as_ref());
            for _ in 0..5 {
                assert_eq!(sync(&c, url.as_ref()), first);
            }
        }
    }

    #[test]
    fn every_member_id_resolves_to_itself() {
        let c = courses(&["p", "q", "r", "s"]);
        for course in &c {
            assert_eq!(sync(&c, Some(&course.course_id)), Some(course.course_id.clone()));
        }
    }

    #[test]
    fn observe_skips_recompute_when_inputs_unchanged() {
        let c = courses(&["a", "b"]);
        let mut state = SelectionState::new();
        assert_eq!(state.observe(1, &c, Some(&id("b"))), Some(&id("b")));

        // A local override survives as long as neither input changes.
        state.set(id("a"));
        assert_eq!(state.observe(1, &c, Some(&id("b"))), Some(&id("a")));

        // New URL id forces re-derivation.
        assert_eq!(state.observe(1, &c, None), Some(&id("a")));
        assert_eq!(state.observe(1, &c, Some(&id("b"))), Some(&id("b")));
    }

    #[test]
    fn resync_reports_recompute_only_on_input_change() {
        let c = courses(&["a", "b"]);
        let mut state = SelectionState::new();
        assert!(state.resync(1, &c, None));
        assert!(!state.resync(1, &c, None));
        assert!(state.resync(1, &c, Some(&id("b"))));
        assert!(state.resync(2, &c, Some(&id("b"))));
    }

    #[test]
    fn refetch_revalidates_against_new_collection() {
        let mut state = SelectionState::new();
        let before = courses(&["a", "b", "c"]);
        assert_eq!(state.observe(1, &before, Some(&id("c"))), Some(&id("c")));

        let after = courses(&["d", "e"]);
        assert_eq!(state.observe(2, &after, Some(&id("c"))), Some(&id("d")));

        assert_eq!(state.observe(3, &[], Some(&id("c"))), None);
    }

    #[test]
    fn selection_never_dangles_across_refetches() {
        let mut state = SelectionState::new();
        let snapshots = [
            courses(&["a", "b", "c"]),
            courses(&["b"]),
            courses(&[]),
            courses(&["q", "a"]),
        ];
        let urls = [Some(id("b")), Some(id("c")), None, Some(id("a"))];

        for (generation, (snapshot, url)) in snapshots.iter().zip(urls.iter()).enumerate() {
            let selected = state.observe(generation as u64, snapshot, url.as_ref()).cloned();
            match selected {
                Some(sel) => assert!(snapshot.iter().any(|c| c.course_id == sel)),
                None => assert!(snapshot.is_empty()),
            }
        }
    }
}
