use axum::Json;
use axum::extract::Path;
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::auth::{self, AdminClaims};
use crate::error::AppError;
use crate::models::{
    CareerFormRequest, ContactFormRequest, Course, CourseUpsertRequest, LoginRequest,
};
use crate::state::AppState;
use crate::validation;

#[derive(Serialize)]
struct DataResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct LoginData {
    token: String,
    username: String,
}

fn data<T>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse {
        success: true,
        data,
    })
}

fn message(message: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message,
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/all", get(list_all_courses))
        .route(
            "/api/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/api/courses/{id}/toggle-visibility", patch(toggle_visibility))
        .route("/api/forms/contact", post(submit_contact))
        .route("/api/forms/career", post(submit_career))
        .route("/api/admin/login", post(admin_login))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

/// Public catalog: visible courses only.
async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Course>>>, AppError> {
    let courses = state.courses.list(false).await?;
    Ok(data(courses))
}

/// Dashboard listing: hidden courses included.
async fn list_all_courses(
    State(state): State<AppState>,
    _claims: AdminClaims,
) -> Result<Json<DataResponse<Vec<Course>>>, AppError> {
    let courses = state.courses.list(true).await?;
    Ok(data(courses))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<Course>>, AppError> {
    let course = state.courses.get(id).await?.ok_or(AppError::NotFound)?;
    Ok(data(course))
}

async fn create_course(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Json(req): Json<CourseUpsertRequest>,
) -> Result<(StatusCode, Json<DataResponse<Course>>), AppError> {
    let fields = validation::validate_course(req).map_err(AppError::Validation)?;
    let course = state.courses.create(fields).await?;
    Ok((StatusCode::CREATED, data(course)))
}

async fn update_course(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<i64>,
    Json(req): Json<CourseUpsertRequest>,
) -> Result<Json<DataResponse<Course>>, AppError> {
    let fields = validation::validate_course(req).map_err(AppError::Validation)?;
    let course = state
        .courses
        .update(id, fields)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(data(course))
}

async fn delete_course(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.courses.delete(id).await?;
    Ok(message("Course deleted successfully"))
}

async fn toggle_visibility(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<i64>,
) -> Result<Json<DataResponse<Course>>, AppError> {
    let course = state
        .courses
        .toggle_visibility(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(data(course))
}

async fn submit_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactFormRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let form = validation::validate_contact(req).map_err(AppError::Validation)?;
    state.relay.submit_contact(&form).await?;
    Ok(message("Form submitted successfully"))
}

async fn submit_career(
    State(state): State<AppState>,
    Json(req): Json<CareerFormRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let form = validation::validate_career(req).map_err(AppError::Validation)?;
    state.relay.submit_career(&form).await?;
    Ok(message("Application submitted successfully"))
}

async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<DataResponse<LoginData>>, AppError> {
    let credentials = validation::validate_login(req).map_err(AppError::Validation)?;
    let user =
        auth::authenticate(&state.admins, &credentials.username, &credentials.password).await?;
    let token = state.tokens.issue(&user)?;
    Ok(data(LoginData {
        token,
        username: user.username,
    }))
}
