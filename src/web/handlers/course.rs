//! Course catalogue handlers.
//!
//! Reads are open to any logged-in user; writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::require_admin;
use crate::db::{Course, CourseRepository, CourseUpdate, Lecture, NewCourse, NewLecture};
use crate::web::dto::{
    AddLectureRequest, CreateCourseRequest, MessageResponse, UpdateCourseRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub success: bool,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub success: bool,
    pub message: String,
    pub course: Course,
}

#[derive(Debug, Serialize)]
pub struct LectureListResponse {
    pub success: bool,
    pub lectures: Vec<Lecture>,
}

#[derive(Debug, Serialize)]
pub struct LectureResponse {
    pub success: bool,
    pub message: String,
    pub lecture: Lecture,
}

/// GET /api/v1/courses - List all courses.
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let repo = CourseRepository::new(state.db.pool());
    let courses = repo.list().await?;
    Ok(Json(CourseListResponse {
        success: true,
        courses,
    }))
}

/// GET /api/v1/courses/{id}/lectures - List a course's lectures.
pub async fn list_lectures(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<LectureListResponse>, ApiError> {
    let repo = CourseRepository::new(state.db.pool());
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let lectures = repo.lectures_for(id).await?;
    Ok(Json(LectureListResponse {
        success: true,
        lectures,
    }))
}

/// POST /api/v1/courses - Create a course (admin only).
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    require_admin(Some(&claims)).map_err(|e| ApiError::forbidden(e.to_string()))?;

    let repo = CourseRepository::new(state.db.pool());
    let course = repo
        .create(&NewCourse {
            title: req.title,
            description: req.description,
            category: req.category,
            created_by: claims.sub,
        })
        .await?;

    tracing::info!("course created: {} ({})", course.title, course.id);
    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            success: true,
            message: "Course created successfully".to_string(),
            course,
        }),
    ))
}

/// PUT /api/v1/courses/{id} - Update a course (admin only).
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    require_admin(Some(&claims)).map_err(|e| ApiError::forbidden(e.to_string()))?;

    let repo = CourseRepository::new(state.db.pool());
    let course = repo
        .update(
            id,
            &CourseUpdate {
                title: req.title,
                description: req.description,
                category: req.category,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    Ok(Json(CourseResponse {
        success: true,
        message: "Course updated successfully".to_string(),
        course,
    }))
}

/// DELETE /api/v1/courses/{id} - Delete a course (admin only).
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(Some(&claims)).map_err(|e| ApiError::forbidden(e.to_string()))?;

    let repo = CourseRepository::new(state.db.pool());
    if !repo.delete(id).await? {
        return Err(ApiError::not_found("Course not found"));
    }

    tracing::info!("course deleted: {}", id);
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

/// POST /api/v1/courses/{id}/lectures - Add a lecture (admin only).
pub async fn add_lecture(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<AddLectureRequest>,
) -> Result<(StatusCode, Json<LectureResponse>), ApiError> {
    require_admin(Some(&claims)).map_err(|e| ApiError::forbidden(e.to_string()))?;

    let repo = CourseRepository::new(state.db.pool());
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let lecture = repo
        .add_lecture(
            id,
            &NewLecture {
                title: req.title,
                description: req.description,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LectureResponse {
            success: true,
            message: "Lecture added successfully".to_string(),
            lecture,
        }),
    ))
}
