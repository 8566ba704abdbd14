use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::Redirect,
    routing::get,
};
use uuid::Uuid;

use super::dto::{CreateSubjectRequest, SubjectListQuery, SubjectListResponse, SubjectResponse};
use crate::error::{AppError, AppResult};
use crate::extractor::SuperuserClaims;
use crate::repositories::{DepartmentRepository, NewSubject, SubjectRepository};
use crate::utils::validation::INVALID_CHOICE;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/subjects", get(get_subjects).post(create_subject))
        .route("/api/v1/subjects/{subject_id}", get(get_subject))
}

/// List subjects, optionally of one department
#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    params(SubjectListQuery),
    responses(
        (status = 200, description = "Subjects retrieved", body = SubjectListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Subjects"
)]
pub async fn get_subjects(
    Query(query): Query<SubjectListQuery>,
) -> AppResult<(StatusCode, Json<SubjectListResponse>)> {
    let subjects = SubjectRepository::new().find_all(query.department).await?;

    let response = SubjectListResponse {
        total: subjects.len(),
        subjects: subjects.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/subjects/{subject_id}",
    params(
        ("subject_id" = Uuid, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Subject retrieved", body = SubjectResponse),
        (status = 404, description = "Subject not found")
    ),
    tag = "Subjects"
)]
pub async fn get_subject(
    Path(subject_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<SubjectResponse>)> {
    let subject = SubjectRepository::new()
        .find_by_id(subject_id)
        .await?
        .ok_or(AppError::NotFound("Subject"))?;

    Ok((StatusCode::OK, Json(subject.into())))
}

/// Create a subject (superuser only)
#[utoipa::path(
    post,
    path = "/api/v1/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 303, description = "Subject created, redirect to it"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    SuperuserClaims(_auth_claims): SuperuserClaims,
    Json(payload): Json<CreateSubjectRequest>,
) -> AppResult<Redirect> {
    let (mut errors, department_id) = payload.validate();
    let subject_repo = SubjectRepository::new();

    let code = payload.code.trim().to_string();
    if !errors.has("code") && subject_repo.code_exists(&code).await? {
        errors.add("code", "Subject with this Code already exists.");
    }
    if let Some(department_id) = department_id {
        if DepartmentRepository::new()
            .find_by_id(department_id)
            .await?
            .is_none()
        {
            errors.add("department", INVALID_CHOICE);
        }
    }
    errors.into_result()?;

    let Some(department_id) = department_id else {
        return Err(AppError::BadRequest("department is required".to_string()));
    };

    let subject = subject_repo
        .create(NewSubject {
            name: payload.name.trim().to_string(),
            code,
            department_id,
            description: payload
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
        .await?;

    Ok(Redirect::to(&format!("/api/v1/subjects/{}", subject.subject_id)))
}
