use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::Redirect,
    routing::get,
};
use uuid::Uuid;

use super::dto::{
    CreateDepartmentRequest, DepartmentDetailResponse, DepartmentListResponse,
    DepartmentResponse, UpdateDepartmentRequest,
};
use crate::error::{AppError, AppResult};
use crate::extractor::SuperuserClaims;
use crate::repositories::{DepartmentRepository, DepartmentUpdate, SubjectRepository};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/departments",
            get(get_all_departments).post(create_department),
        )
        .route(
            "/api/v1/departments/{department_id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}

/// Create a new department (superuser only)
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 303, description = "Department created, redirect to it (or home for non-superusers)"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn create_department(
    SuperuserClaims(auth_claims): SuperuserClaims,
    Json(payload): Json<CreateDepartmentRequest>,
) -> AppResult<Redirect> {
    payload.validate().into_result()?;

    let department = DepartmentRepository::new()
        .create(payload.code.trim().to_string(), payload.name.trim().to_string())
        .await?;

    tracing::info!(
        department_id = %department.department_id,
        created_by = %auth_claims.sub,
        "Department created"
    );
    Ok(Redirect::to(&format!(
        "/api/v1/departments/{}",
        department.department_id
    )))
}

/// List all departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments retrieved", body = DepartmentListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Departments"
)]
pub async fn get_all_departments() -> AppResult<(StatusCode, Json<DepartmentListResponse>)> {
    let departments = DepartmentRepository::new().find_all().await?;

    let response = DepartmentListResponse {
        total: departments.len(),
        departments: departments.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Department with its subjects
#[utoipa::path(
    get,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id" = Uuid, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department retrieved", body = DepartmentDetailResponse),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Departments"
)]
pub async fn get_department(
    Path(department_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<DepartmentDetailResponse>)> {
    let department = DepartmentRepository::new()
        .find_by_id(department_id)
        .await?
        .ok_or(AppError::NotFound("Department"))?;
    let subjects = SubjectRepository::new()
        .find_all(Some(department_id))
        .await?;

    let response = DepartmentDetailResponse {
        department: DepartmentResponse::from(department),
        subjects: subjects.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Update department (superuser only)
#[utoipa::path(
    put,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id" = Uuid, Path, description = "Department ID")
    ),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 303, description = "Department updated, redirect to it"),
        (status = 404, description = "Department not found"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn update_department(
    SuperuserClaims(_auth_claims): SuperuserClaims,
    Path(department_id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> AppResult<Redirect> {
    payload.validate().into_result()?;

    let updates = DepartmentUpdate {
        code: payload.code.map(|code| code.trim().to_string()),
        name: payload.name.map(|name| name.trim().to_string()),
    };

    DepartmentRepository::new()
        .update(department_id, updates)
        .await?
        .ok_or(AppError::NotFound("Department"))?;

    Ok(Redirect::to(&format!("/api/v1/departments/{department_id}")))
}

/// Delete department and its subjects (superuser only)
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}",
    params(
        ("department_id" = Uuid, Path, description = "Department ID")
    ),
    responses(
        (status = 303, description = "Department deleted, redirect to the list"),
        (status = 404, description = "Department not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn delete_department(
    SuperuserClaims(auth_claims): SuperuserClaims,
    Path(department_id): Path<Uuid>,
) -> AppResult<Redirect> {
    if !DepartmentRepository::new().delete(department_id).await? {
        return Err(AppError::NotFound("Department"));
    }

    tracing::warn!(%department_id, deleted_by = %auth_claims.sub, "Department deleted");
    Ok(Redirect::to("/api/v1/departments"))
}
