use tracing::debug;

use crate::carousel::Carousel;
use crate::catalog::Catalog;
use crate::course::Course;
use crate::navigation::{Navigator, PushOptions};
use crate::route::Route;

pub const PREVIEW_LIMIT: usize = 4;

pub const FEATURED_TAGS: [&str; 5] = [
    "web development",
    "enterprise IT",
    "react nextjs",
    "javascript",
    "backend development",
];

/// Entry page: hero carousel plus a short, non-selectable course preview.
#[derive(Debug)]
pub struct LandingTeaser {
    carousel: Carousel,
    cursor: usize,
}

impl LandingTeaser {
    pub fn new() -> Self {
        Self {
            carousel: Carousel::hero(),
            cursor: 0,
        }
    }

    pub fn previews(catalog: &Catalog) -> &[Course] {
        catalog
            .courses()
            .map(|courses| &courses[..courses.len().min(PREVIEW_LIMIT)])
            .unwrap_or(&[])
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn on_tick(&mut self) {
        self.carousel.advance();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self, catalog: &Catalog) {
        if self.cursor + 1 < Self::previews(catalog).len() {
            self.cursor += 1;
        }
    }

    /// Preview card click: hands off to the search page with the id in the URL.
    pub fn open(&self, catalog: &Catalog, index: usize, nav: &mut Navigator) {
        if let Some(course) = Self::previews(catalog).get(index) {
            debug!(course_id = %course.course_id, "opening course from landing");
            nav.push_url(
                Route::search(Some(course.course_id.clone())).to_path(),
                PushOptions {
                    suppress_scroll: true,
                },
            );
        }
    }

    pub fn open_cursor(&self, catalog: &Catalog, nav: &mut Navigator) {
        self.open(catalog, self.cursor, nav);
    }

    /// "Search for Courses" call to action.
    pub fn search_all(&self, nav: &mut Navigator) {
        nav.push_url(
            Route::search(None).to_path(),
            PushOptions {
                suppress_scroll: true,
            },
        );
    }
}

impl Default for LandingTeaser {
    fn default() -> Self {
        Self::new()
    }
}
