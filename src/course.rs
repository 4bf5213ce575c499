use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub chapter_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub section_id: String,
    #[serde(default)]
    pub section_title: String,
    #[serde(default)]
    pub section_description: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: CourseId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Price in cents.
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub enrollments: Vec<serde_json::Value>,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            course_id: CourseId::new(id),
            title: title.into(),
            description: None,
            teacher_name: None,
            category: None,
            image: None,
            price: None,
            level: None,
            status: None,
            sections: Vec::new(),
            enrollments: Vec::new(),
        }
    }

    pub fn price_label(&self) -> String {
        format_price(self.price.unwrap_or(0))
    }

    pub fn chapter_count(&self) -> usize {
        self.sections.iter().map(|s| s.chapters.len()).sum()
    }
}

pub fn format_price(cents: u64) -> String {
    if cents == 0 {
        return "Free".to_string();
    }
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_as_dollars() {
        assert_eq!(format_price(4999), "$49.99");
        assert_eq!(format_price(100), "$1.00");
        assert_eq!(format_price(5), "$0.05");
        assert_eq!(format_price(0), "Free");
    }

    #[test]
    fn deserializes_partial_api_record() {
        let json = r#"{
            "courseId": "c1",
            "title": "Intro to Rust",
            "price": 4999,
            "sections": [{"sectionId": "s1", "sectionTitle": "Basics",
                          "chapters": [{"chapterId": "ch1", "title": "Hello", "type": "Text"}]}]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.course_id, CourseId::new("c1"));
        assert_eq!(course.price_label(), "$49.99");
        assert_eq!(course.chapter_count(), 1);
        assert!(course.description.is_none());
        assert_eq!(course.sections[0].chapters[0].kind.as_deref(), Some("Text"));
    }
}
