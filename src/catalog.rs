use std::sync::Arc;
use tracing::{info, warn};

use crate::course::Course;
use crate::error::CourseError;

#[derive(Debug, Clone)]
pub enum FetchState {
    Loading,
    Failed(String),
    Ready(Arc<[Course]>),
}

/// Latest course snapshot plus its identity.
///
/// Every fetch gets a token; a result is only applied if its token is the
/// newest one handed out, so a superseded fetch never overwrites a newer one.
#[derive(Debug)]
pub struct Catalog {
    state: FetchState,
    generation: u64,
    latest_request: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            state: FetchState::Loading,
            generation: 0,
            latest_request: 0,
        }
    }

    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_request += 1;
        self.state = FetchState::Loading;
        self.latest_request
    }

    pub fn resolve(&mut self, request: u64, result: Result<Vec<Course>, CourseError>) -> bool {
        if request != self.latest_request {
            warn!(request, latest = self.latest_request, "dropping stale course fetch");
            return false;
        }

        self.generation += 1;
        self.state = match result {
            Ok(courses) => {
                info!(count = courses.len(), generation = self.generation, "courses loaded");
                FetchState::Ready(courses.into())
            }
            Err(e) => {
                warn!(error = %e, "course fetch failed");
                FetchState::Failed(e.to_string())
            }
        };
        true
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn courses(&self) -> Option<&[Course]> {
        match &self.state {
            FetchState::Ready(courses) => Some(courses),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
