use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    CourseDetails, CourseListItem, CreateCourseRequest, CreatedCourseResponse,
    UpdateCourseRequest,
};
use super::repo::Course;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:id", get(get_course))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", post(create_course))
        .route("/courses/:id", put(update_course).delete(delete_course))
}

/// Public listing. Unbounded: no pagination on purpose.
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseListItem>>, AppError> {
    let courses = Course::find_all(&state.db).await?;
    let items = courses
        .into_iter()
        .map(|c| CourseListItem {
            title: c.title,
            description: c.description,
            estimated_time: c.estimated_time,
            materials_needed: c.materials_needed,
            user_id: c.user_id,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetails>, AppError> {
    let Some(course) = Course::find_by_id(&state.db, id).await? else {
        return Err(AppError::NotFound("Course not found".into()));
    };
    Ok(Json(CourseDetails {
        title: course.title,
        description: course.description,
        estimated_time: course.estimated_time,
        materials_needed: course.materials_needed,
        user_id: course.user_id,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedCourseResponse>), AppError> {
    let title = payload.title.as_deref().unwrap_or_default();
    let description = payload.description.as_deref().unwrap_or_default();
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(AppError::BadRequest("title and description required".into()));
    }

    // The owner is always the authenticated identity.
    let course = Course::create(
        &state.db,
        user.id,
        title,
        description,
        payload.estimated_time.as_deref(),
        payload.materials_needed.as_deref(),
    )
    .await?;

    info!(course_id = %course.id, user_id = %user.id, "course created");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        format!("/courses/{}", course.id).parse().unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedCourseResponse {
            id: course.id,
            title: course.title,
            description: course.description,
            estimated_time: course.estimated_time,
            materials_needed: course.materials_needed,
            user_id: course.user_id,
        }),
    ))
}

#[instrument(skip(state, user, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<StatusCode, AppError> {
    let Some(course) = Course::find_by_id(&state.db, id).await? else {
        return Err(AppError::NotFound("Course not found".into()));
    };
    if course.user_id != user.id {
        warn!(course_id = %course.id, user_id = %user.id, "update rejected: not the owner");
        return Err(AppError::Forbidden(
            "This user is not authorized to edit this course".into(),
        ));
    }

    // Supplied fields overwrite, omitted fields keep their stored values.
    let title = payload.title.as_deref().unwrap_or(&course.title);
    let description = payload.description.as_deref().unwrap_or(&course.description);
    let estimated_time = payload
        .estimated_time
        .as_deref()
        .or(course.estimated_time.as_deref());
    let materials_needed = payload
        .materials_needed
        .as_deref()
        .or(course.materials_needed.as_deref());

    course
        .update(&state.db, title, description, estimated_time, materials_needed)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user))]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let Some(course) = Course::find_by_id(&state.db, id).await? else {
        return Err(AppError::NotFound("Course not found".into()));
    };
    if course.user_id != user.id {
        warn!(course_id = %course.id, user_id = %user.id, "delete rejected: not the owner");
        return Err(AppError::Forbidden(
            "This user is not authorized to delete this course".into(),
        ));
    }

    course.delete(&state.db).await?;
    info!(course_id = %course.id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}
