//! Course repository for openlms.

use sqlx::SqlitePool;

use super::course::{Course, CourseUpdate, Lecture, NewCourse, NewLecture};
use crate::{LmsError, Result};

/// Repository for course and lecture operations.
pub struct CourseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CourseRepository<'a> {
    /// Create a new repository over the given pool.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new course.
    pub async fn create(&self, new_course: &NewCourse) -> Result<Course> {
        let result = sqlx::query(
            "INSERT INTO courses (title, description, category, created_by)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&new_course.title)
        .bind(&new_course.description)
        .bind(&new_course.category)
        .bind(new_course.created_by)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| LmsError::NotFound("course".to_string()))
    }

    /// Get a course by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, category, created_by, created_at
             FROM courses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(course)
    }

    /// List all courses, newest first.
    pub async fn list(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, category, created_by, created_at
             FROM courses ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(courses)
    }

    /// Apply a partial update. Returns the updated course, or None if the
    /// course does not exist.
    pub async fn update(&self, id: i64, update: &CourseUpdate) -> Result<Option<Course>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let result = sqlx::query(
            "UPDATE courses SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                category = COALESCE(?, category)
             WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.category)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a course and its lectures. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a lecture at the end of a course.
    pub async fn add_lecture(&self, course_id: i64, lecture: &NewLecture) -> Result<Lecture> {
        let result = sqlx::query(
            "INSERT INTO lectures (course_id, title, description, position)
             VALUES (?, ?, ?,
                     (SELECT COALESCE(MAX(position), 0) + 1 FROM lectures WHERE course_id = ?))",
        )
        .bind(course_id)
        .bind(&lecture.title)
        .bind(&lecture.description)
        .bind(course_id)
        .execute(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        let lecture = sqlx::query_as::<_, Lecture>(
            "SELECT id, course_id, title, description, position FROM lectures WHERE id = ?",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(lecture)
    }

    /// List a course's lectures in position order.
    pub async fn lectures_for(&self, course_id: i64) -> Result<Vec<Lecture>> {
        let lectures = sqlx::query_as::<_, Lecture>(
            "SELECT id, course_id, title, description, position
             FROM lectures WHERE course_id = ? ORDER BY position ASC",
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| LmsError::Database(e.to_string()))?;

        Ok(lectures)
    }
}
