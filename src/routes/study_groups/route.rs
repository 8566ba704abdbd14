use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CreateStudyGroupRequest, StudyGroupDetailResponse, StudyGroupListResponse,
};
use crate::error::{AppError, AppResult};
use crate::extractor::{AuthClaims, MaybeAuthClaims};
use crate::repositories::{NewStudyGroup, StudyGroupRepository, SubjectRepository};
use crate::utils::validation::{FormErrors, invalid_choice};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/study-groups",
            get(get_study_groups).post(create_study_group),
        )
        .route("/api/v1/study-groups/{study_group_id}", get(get_study_group))
        .route(
            "/api/v1/study-groups/{study_group_id}/join",
            post(join_study_group),
        )
}

fn detail_redirect(study_group_id: Uuid) -> Redirect {
    Redirect::to(&format!("/api/v1/study-groups/{study_group_id}"))
}

/// Public study groups, newest first
#[utoipa::path(
    get,
    path = "/api/v1/study-groups",
    responses(
        (status = 200, description = "Study groups retrieved", body = StudyGroupListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Study Groups"
)]
pub async fn get_study_groups() -> AppResult<(StatusCode, Json<StudyGroupListResponse>)> {
    let groups = StudyGroupRepository::new().find_public(None).await?;

    let response = StudyGroupListResponse {
        total: groups.len(),
        study_groups: groups.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Create a study group; the creator becomes its first member
#[utoipa::path(
    post,
    path = "/api/v1/study-groups",
    request_body = CreateStudyGroupRequest,
    responses(
        (status = 303, description = "Group created, redirect to it"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Study Groups"
)]
pub async fn create_study_group(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateStudyGroupRequest>,
) -> AppResult<Redirect> {
    let clean = payload.clean()?;

    if !SubjectRepository::new().exists(clean.subject_id).await? {
        let mut errors = FormErrors::new();
        errors.add("subject", invalid_choice(payload.subject.trim()));
        return Err(errors.into());
    }

    let group = StudyGroupRepository::new()
        .create(NewStudyGroup {
            name: clean.name,
            description: clean.description,
            subject_id: clean.subject_id,
            created_by: auth_claims.sub,
            is_public: clean.is_public,
            max_members: clean.max_members,
        })
        .await?;

    tracing::info!(
        study_group_id = %group.study_group_id,
        created_by = %auth_claims.sub,
        "Study group created"
    );
    Ok(detail_redirect(group.study_group_id))
}

#[utoipa::path(
    get,
    path = "/api/v1/study-groups/{study_group_id}",
    params(
        ("study_group_id" = Uuid, Path, description = "Study group ID")
    ),
    responses(
        (status = 200, description = "Study group retrieved", body = StudyGroupDetailResponse),
        (status = 404, description = "Study group not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Study Groups"
)]
pub async fn get_study_group(
    MaybeAuthClaims(auth_claims): MaybeAuthClaims,
    Path(study_group_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<StudyGroupDetailResponse>)> {
    let group_repo = StudyGroupRepository::new();
    let group = group_repo
        .find_by_id(study_group_id)
        .await?
        .ok_or(AppError::NotFound("Study group"))?;
    let members = group_repo.find_members(study_group_id).await?;
    let member_count = group_repo.member_count(study_group_id).await?;
    let is_member = match &auth_claims {
        Some(claims) => group_repo.is_member(study_group_id, claims.sub).await?,
        None => false,
    };

    let response = StudyGroupDetailResponse {
        study_group: group.into(),
        members: members.into_iter().map(Into::into).collect(),
        member_count,
        is_member,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Join a study group
#[utoipa::path(
    post,
    path = "/api/v1/study-groups/{study_group_id}/join",
    params(
        ("study_group_id" = Uuid, Path, description = "Study group ID")
    ),
    responses(
        (status = 303, description = "Joined (or already a member), redirect to the group"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Study group not found"),
        (status = 409, description = "Study group is full"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Study Groups"
)]
pub async fn join_study_group(
    AuthClaims(auth_claims): AuthClaims,
    Path(study_group_id): Path<Uuid>,
) -> AppResult<Redirect> {
    let result = StudyGroupRepository::new()
        .join(study_group_id, auth_claims.sub)
        .await?
        .ok_or(AppError::NotFound("Study group"))?;

    if !result.is_member() {
        return Err(AppError::GroupFull);
    }

    tracing::info!(%study_group_id, user_id = %auth_claims.sub, "{}", result.message());
    Ok(detail_redirect(study_group_id))
}
