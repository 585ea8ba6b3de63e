//! Course and lecture models for openlms.

use serde::Serialize;

/// A course in the catalogue.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Course {
    /// Unique course ID.
    pub id: i64,
    /// Course title.
    pub title: String,
    /// Course description.
    pub description: String,
    /// Category label for browsing.
    pub category: String,
    /// ID of the admin account that created the course.
    #[serde(rename = "createdBy")]
    pub created_by: i64,
    /// Creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// A lecture within a course.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Lecture {
    /// Unique lecture ID.
    pub id: i64,
    /// Owning course ID.
    #[serde(rename = "courseId")]
    pub course_id: i64,
    /// Lecture title.
    pub title: String,
    /// Lecture description.
    pub description: String,
    /// Ordering within the course, ascending.
    pub position: i64,
}

/// Data for creating a new course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: i64,
}

/// Data for adding a lecture to a course.
#[derive(Debug, Clone)]
pub struct NewLecture {
    pub title: String,
    pub description: String,
}

/// Partial update to a course. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl CourseUpdate {
    /// Whether the update changes anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category.is_none()
    }
}
