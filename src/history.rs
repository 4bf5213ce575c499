use std::collections::VecDeque;

const MAX_HISTORY_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: String,
    pub title: String,
}

pub struct History {
    entries: VecDeque<HistoryEntry>,
    current_index: Option<usize>,
    max_size: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_index: None,
            max_size: max_size.max(1),
        }
    }

    pub fn add(&mut self, path: String, title: String) {
        let entry = HistoryEntry { path, title };

        // Pushing from the middle of history drops the forward entries
        if let Some(current) = self.current_index {
            self.entries.truncate(current + 1);
        }

        self.entries.push_back(entry);
        self.current_index = Some(self.entries.len() - 1);

        while self.entries.len() > self.max_size {
            self.entries.pop_front();
            if let Some(ref mut current) = self.current_index {
                *current = current.saturating_sub(1);
            }
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.current_index.map_or(false, |i| i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_index
            .map_or(false, |i| i + 1 < self.entries.len())
    }

    pub fn go_back(&mut self) -> Option<&HistoryEntry> {
        if self.can_go_back() {
            if let Some(ref mut current) = self.current_index {
                *current -= 1;
                return self.entries.get(*current);
            }
        }
        None
    }

    pub fn go_forward(&mut self) -> Option<&HistoryEntry> {
        if self.can_go_forward() {
            if let Some(ref mut current) = self.current_index {
                *current += 1;
                return self.entries.get(*current);
            }
        }
        None
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current_index.and_then(|i| self.entries.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn list(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(history: &History) -> Vec<&str> {
        history.list().iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn back_and_forward_walk_entries() {
        let mut history = History::new();
        history.add("/".into(), "Courses".into());
        history.add("/search".into(), "Search".into());
        history.add("/search?id=b".into(), "Search".into());

        assert_eq!(history.go_back().map(|e| e.path.as_str()), Some("/search"));
        assert_eq!(history.go_back().map(|e| e.path.as_str()), Some("/"));
        assert!(history.go_back().is_none());
        assert_eq!(
            history.go_forward().map(|e| e.path.as_str()),
            Some("/search")
        );
    }

    #[test]
    fn adding_after_going_back_discards_forward_entries() {
        let mut history = History::new();
        history.add("/".into(), "Courses".into());
        history.add("/search?id=a".into(), "Search".into());
        history.go_back();
        history.add("/search?id=c".into(), "Search".into());

        assert_eq!(paths(&history), vec!["/", "/search?id=c"]);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn oldest_entries_are_evicted_at_capacity() {
        let mut history = History::with_capacity(2);
        history.add("/a".into(), "A".into());
        history.add("/b".into(), "B".into());
        history.add("/c".into(), "C".into());

        assert_eq!(paths(&history), vec!["/b", "/c"]);
        assert_eq!(history.current().map(|e| e.path.as_str()), Some("/c"));
    }
}
