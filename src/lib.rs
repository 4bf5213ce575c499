pub mod app;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod course;
pub mod discovery;
pub mod error;
pub mod history;
pub mod landing;
pub mod logging;
pub mod navigation;
pub mod route;
pub mod selection;
pub mod source;
pub mod ui;

pub use app::{App, Session};
pub use config::Config;
pub use course::{Course, CourseId};
pub use error::{CourseError, Result};
pub use source::{CourseSource, HttpCourseSource, StaticCourseSource};
