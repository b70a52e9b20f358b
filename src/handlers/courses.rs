//! Public course listing

use axum::extract::{Path, Query, State};

use crate::handlers::response::{ok, ApiResult};
use crate::models::{Course, CourseQuery, Page};
use crate::state::AppState;

pub async fn list_courses(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> ApiResult<Page<Course>> {
    ok(state.services.course_catalog.search(&query))
}

pub async fn get_course(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Course> {
    ok(state.services.course_catalog.get(&id)?.clone())
}
