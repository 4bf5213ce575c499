use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::course::Course;
use crate::error::{CourseError, Result};

const USER_AGENT: &str = "coursebow/0.1.0";
const MAX_REDIRECTS: usize = 5;

/// Parameterless read of the full course collection.
#[async_trait]
pub trait CourseSource: Send + Sync {
    async fn fetch_courses(&self) -> Result<Vec<Course>>;
}

// The API wraps payloads as `{ "message": ..., "data": ... }`; older
// deployments return the bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum CoursesPayload {
    Envelope {
        #[serde(default)]
        message: Option<String>,
        data: Vec<Course>,
    },
    Bare(Vec<Course>),
}

impl CoursesPayload {
    fn into_courses(self) -> Vec<Course> {
        match self {
            Self::Envelope { message, data } => {
                if let Some(message) = message {
                    debug!(%message, "courses envelope");
                }
                data
            }
            Self::Bare(data) => data,
        }
    }
}

pub fn decode_courses(body: &str) -> Result<Vec<Course>> {
    let payload: CoursesPayload = serde_json::from_str(body)?;
    Ok(payload.into_courses())
}

pub struct HttpCourseSource {
    client: Client,
    endpoint: Url,
}

impl HttpCourseSource {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        let mut base = Url::parse(api_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("courses")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CourseSource for HttpCourseSource {
    async fn fetch_courses(&self) -> Result<Vec<Course>> {
        debug!(url = %self.endpoint, "fetching courses");
        let response = self.client.get(self.endpoint.clone()).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %self.endpoint, "course fetch rejected");
            return Err(CourseError::Status {
                status: response.status().as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        decode_courses(&body)
    }
}

/// Serves a fixed snapshot; used for `--demo` and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCourseSource {
    courses: Vec<Course>,
}

impl StaticCourseSource {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn demo() -> Self {
        let mut rust = Course::new("3a9f0432-721e-4c41-a7ce-1d2c8e2c3b71", "Introduction to Rust");
        rust.teacher_name = Some("Ferris Crab".to_string());
        rust.category = Some("Systems Programming".to_string());
        rust.level = Some("Beginner".to_string());
        rust.price = Some(4999);
        rust.description = Some(
            "Ownership, borrowing and the type system from first principles.".to_string(),
        );

        let mut web = Course::new("b5f8d3a1-0c7e-4b8e-9f3d-2e6a7c1d4f52", "Modern Web Development");
        web.teacher_name = Some("Ada Markup".to_string());
        web.category = Some("Web Development".to_string());
        web.level = Some("Intermediate".to_string());
        web.price = Some(8999);
        web.description =
            Some("Build and ship a full-stack application with a serverless backend.".to_string());

        let mut it = Course::new("c7e2a9b4-5d1f-4a3c-8b6e-9f0d2c4a7e13", "Enterprise IT Fundamentals");
        it.teacher_name = Some("Grace Ops".to_string());
        it.category = Some("Enterprise IT".to_string());
        it.level = Some("Beginner".to_string());
        it.price = Some(0);

        let mut backend = Course::new("d1c4e7f0-2a5b-4c8d-9e1f-3a6b9c2d5e84", "Backend APIs in Practice");
        backend.teacher_name = Some("Linus Socket".to_string());
        backend.category = Some("Backend Development".to_string());
        backend.level = Some("Advanced".to_string());
        backend.price = Some(12900);

        let mut js = Course::new("e9a2b5c8-1d4e-4f7a-8b0c-6d9e2f5a8b36", "JavaScript Deep Dive");
        js.teacher_name = Some("Brendan Loop".to_string());
        js.category = Some("Javascript".to_string());
        js.level = Some("Intermediate".to_string());
        js.price = Some(3900);

        Self::new(vec![rust, web, it, backend, js])
    }
}

#[async_trait]
impl CourseSource for StaticCourseSource {
    async fn fetch_courses(&self) -> Result<Vec<Course>> {
        Ok(self.courses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope_and_bare_array() {
        let envelope = r#"{"message":"Courses retrieved successfully","data":[{"courseId":"a"}]}"#;
        let bare = r#"[{"courseId":"a"},{"courseId":"b"}]"#;
        assert_eq!(decode_courses(envelope).unwrap().len(), 1);
        assert_eq!(decode_courses(bare).unwrap().len(), 2);
    }

    #[test]
    fn rejects_unrecognized_payload() {
        assert!(matches!(
            decode_courses(r#"{"courses":[]}"#),
            Err(CourseError::Decode(_))
        ));
    }

    #[test]
    fn endpoint_joins_onto_base_path() {
        let source = HttpCourseSource::new("http://localhost:8001/dev", Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint().as_str(), "http://localhost:8001/dev/courses");
        let source = HttpCourseSource::new("http://localhost:8001", Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint().as_str(), "http://localhost:8001/courses");
    }

    #[tokio::test]
    async fn static_source_returns_snapshot() {
        let courses = StaticCourseSource::demo().fetch_courses().await.unwrap();
        assert_eq!(courses.len(), 5);
    }
}
