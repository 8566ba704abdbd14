use std::path::Path as FsPath;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CommentRequest, MaterialDetailResponse, MaterialForm, MaterialListQuery,
    MaterialListResponse, RateMaterialRequest,
};
use crate::config::APP_CONFIG;
use crate::entities::rating::{MAX_SCORE, MIN_SCORE};
use crate::entities::sea_orm_active_enums::MaterialType;
use crate::error::{AppError, AppResult};
use crate::extractor::{AuthClaims, MaybeAuthClaims};
use crate::repositories::rating_repository::average_score;
use crate::repositories::{
    CommentRepository, MaterialFilter, MaterialRepository, MaterialUpdate, NewMaterial,
    RatingRepository, SavedMaterialRepository, SubjectRepository,
};
use crate::utils::upload::{
    download_name, read_multipart_form, remove_stored_file, resolve_stored_path,
    store_material_file,
};
use crate::utils::validation::{FormErrors, REQUIRED, invalid_choice};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/materials",
            get(get_materials)
                .post(upload_material)
                .layer(DefaultBodyLimit::max(APP_CONFIG.max_upload_size_bytes())),
        )
        .route(
            "/api/v1/materials/{material_id}",
            get(get_material)
                .put(update_material)
                .delete(delete_material),
        )
        .route("/api/v1/materials/{material_id}/save", post(save_material))
        .route("/api/v1/materials/{material_id}/rate", post(rate_material))
        .route(
            "/api/v1/materials/{material_id}/comments",
            post(add_comment),
        )
        .route(
            "/api/v1/materials/{material_id}/report",
            post(report_material),
        )
        .route(
            "/api/v1/materials/{material_id}/download",
            get(download_material),
        )
}

fn detail_redirect(material_id: Uuid) -> Redirect {
    Redirect::to(&format!("/api/v1/materials/{material_id}"))
}

async fn ensure_subject_exists(subject_id: Uuid, subject: &str) -> AppResult<()> {
    if SubjectRepository::new().exists(subject_id).await? {
        return Ok(());
    }
    let mut errors = FormErrors::new();
    errors.add("subject", invalid_choice(subject.trim()));
    Err(errors.into())
}

/// List approved materials, newest first
///
/// A `subject` or `type` that does not name anything yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/materials",
    params(MaterialListQuery),
    responses(
        (status = 200, description = "Materials retrieved", body = MaterialListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Materials"
)]
pub async fn get_materials(
    Query(query): Query<MaterialListQuery>,
) -> AppResult<(StatusCode, Json<MaterialListResponse>)> {
    let subjects = SubjectRepository::new().find_all(None).await?;

    let subject = query.subject.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let material_type = query
        .material_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let subject_id = match subject.map(Uuid::parse_str) {
        Some(Ok(id)) => Some(id),
        Some(Err(_)) => None,
        None => None,
    };
    let parsed_type = material_type.and_then(MaterialType::parse);
    let unmatched_filter =
        (subject.is_some() && subject_id.is_none()) || (material_type.is_some() && parsed_type.is_none());

    let materials = if unmatched_filter {
        Vec::new()
    } else {
        let filter = MaterialFilter {
            subject_id,
            material_type: parsed_type,
            query: query.q,
        };
        MaterialRepository::new().find_approved(&filter, None).await?
    };

    let response = MaterialListResponse {
        total: materials.len(),
        materials: materials.into_iter().map(Into::into).collect(),
        subjects: subjects.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Upload a new material
#[utoipa::path(
    post,
    path = "/api/v1/materials",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Fields: title, description, subject, material_type, tags, file (binary)"
    ),
    responses(
        (status = 303, description = "Material uploaded, redirect to its detail"),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn upload_material(
    AuthClaims(auth_claims): AuthClaims,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = read_multipart_form(multipart, "file").await?;
    let fields = MaterialForm::from_multipart(&form);

    let (clean, file) = match (fields.clean(), form.file) {
        (Ok(clean), Some(file)) => (clean, file),
        (result, file) => {
            let mut errors = result.err().unwrap_or_default();
            if file.is_none() {
                errors.add("file", REQUIRED);
            }
            return Err(errors.into());
        }
    };
    ensure_subject_exists(clean.subject_id, &fields.subject).await?;

    let stored_path = store_material_file(
        FsPath::new(&APP_CONFIG.upload_dir),
        &file.file_name,
        &file.data,
    )
    .await
    .context("Failed to store uploaded file")?;

    let material = MaterialRepository::new()
        .create(NewMaterial {
            title: clean.title,
            description: clean.description,
            file: stored_path,
            uploaded_by: auth_claims.sub,
            subject_id: clean.subject_id,
            material_type: clean.material_type,
            tags: clean.tags,
        })
        .await?;

    tracing::info!(
        material_id = %material.material_id,
        uploaded_by = %auth_claims.sub,
        size = file.data.len(),
        "Material uploaded"
    );
    Ok(detail_redirect(material.material_id))
}

/// Material detail; every request counts one view
#[utoipa::path(
    get,
    path = "/api/v1/materials/{material_id}",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Material retrieved", body = MaterialDetailResponse),
        (status = 404, description = "Material not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Materials"
)]
pub async fn get_material(
    MaybeAuthClaims(auth_claims): MaybeAuthClaims,
    Path(material_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<MaterialDetailResponse>)> {
    let material = MaterialRepository::new()
        .record_view(material_id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    let rating_repo = RatingRepository::new();
    let comments = CommentRepository::new()
        .find_for_material(material_id)
        .await?;
    let ratings = rating_repo.find_for_material(material_id).await?;

    let (is_saved, user_rating) = match &auth_claims {
        Some(claims) => {
            let is_saved = SavedMaterialRepository::new()
                .is_saved(claims.sub, material_id)
                .await?;
            let user_rating = rating_repo
                .find_by_user(material_id, claims.sub)
                .await?
                .map(|rating| rating.score);
            (is_saved, user_rating)
        }
        None => (false, None),
    };

    let response = MaterialDetailResponse {
        avg_rating: average_score(&ratings),
        material: material.into(),
        comments: comments.into_iter().map(Into::into).collect(),
        ratings: ratings.into_iter().map(Into::into).collect(),
        is_saved,
        user_rating,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Edit a material (uploader only)
#[utoipa::path(
    put,
    path = "/api/v1/materials/{material_id}",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    request_body = MaterialForm,
    responses(
        (status = 303, description = "Material updated, redirect to its detail"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found or not yours"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn update_material(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
    Json(payload): Json<MaterialForm>,
) -> AppResult<Redirect> {
    let clean = payload.clean()?;
    ensure_subject_exists(clean.subject_id, &payload.subject).await?;

    MaterialRepository::new()
        .update_owned(
            material_id,
            auth_claims.sub,
            MaterialUpdate {
                title: clean.title,
                description: clean.description,
                subject_id: clean.subject_id,
                material_type: clean.material_type,
                tags: clean.tags,
            },
        )
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    Ok(detail_redirect(material_id))
}

/// Delete a material and its stored file (uploader only)
#[utoipa::path(
    delete,
    path = "/api/v1/materials/{material_id}",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 303, description = "Material deleted, redirect to the list"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found or not yours"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn delete_material(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
) -> AppResult<Redirect> {
    let material = MaterialRepository::new()
        .delete_owned(material_id, auth_claims.sub)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    if let Err(e) = remove_stored_file(FsPath::new(&APP_CONFIG.upload_dir), &material.file).await
    {
        tracing::warn!(%material_id, file = %material.file, "Failed to remove stored file: {}", e);
    }

    tracing::info!(%material_id, deleted_by = %auth_claims.sub, "Material deleted");
    Ok(Redirect::to("/api/v1/materials"))
}

/// Save or unsave a material
#[utoipa::path(
    post,
    path = "/api/v1/materials/{material_id}/save",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 303, description = "Save toggled, redirect to the material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn save_material(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
) -> AppResult<Redirect> {
    MaterialRepository::new()
        .find_by_id(material_id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    let result = SavedMaterialRepository::new()
        .toggle(auth_claims.sub, material_id)
        .await?;

    tracing::info!(%material_id, user_id = %auth_claims.sub, "{}", result.message());
    Ok(detail_redirect(material_id))
}

/// Rate a material from 1 to 5; rating again overwrites the score
#[utoipa::path(
    post,
    path = "/api/v1/materials/{material_id}/rate",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    request_body = RateMaterialRequest,
    responses(
        (status = 303, description = "Rating stored, redirect to the material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
        (status = 422, description = "Missing or out-of-range score"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn rate_material(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
    Json(payload): Json<RateMaterialRequest>,
) -> AppResult<Redirect> {
    let score = match payload.score {
        Some(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => score,
        Some(score) => {
            let mut errors = FormErrors::new();
            errors.add("score", invalid_choice(&score.to_string()));
            return Err(errors.into());
        }
        None => {
            let mut errors = FormErrors::new();
            errors.add("score", REQUIRED);
            return Err(errors.into());
        }
    };

    MaterialRepository::new()
        .find_by_id(material_id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    let result = RatingRepository::new()
        .upsert(material_id, auth_claims.sub, score)
        .await?;

    tracing::info!(%material_id, user_id = %auth_claims.sub, score, "{}", result.message());
    Ok(detail_redirect(material_id))
}

/// Comment on a material
#[utoipa::path(
    post,
    path = "/api/v1/materials/{material_id}/comments",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 303, description = "Comment added, redirect to the material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
        (status = 422, description = "Empty comment"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn add_comment(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Redirect> {
    let mut errors = FormErrors::new();
    errors.require("content", &payload.content);
    errors.into_result()?;

    MaterialRepository::new()
        .find_by_id(material_id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    CommentRepository::new()
        .create(
            material_id,
            auth_claims.sub,
            payload.content.trim().to_string(),
        )
        .await?;

    Ok(detail_redirect(material_id))
}

/// Report a material to moderators
#[utoipa::path(
    post,
    path = "/api/v1/materials/{material_id}/report",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 303, description = "Report counted, redirect to the material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Materials"
)]
pub async fn report_material(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
) -> AppResult<Redirect> {
    if !MaterialRepository::new().report(material_id).await? {
        return Err(AppError::NotFound("Material"));
    }

    tracing::warn!(%material_id, reported_by = %auth_claims.sub, "Material reported");
    Ok(detail_redirect(material_id))
}

/// Download the material's file; counts one download
#[utoipa::path(
    get,
    path = "/api/v1/materials/{material_id}/download",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "Material or stored file not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Materials"
)]
pub async fn download_material(Path(material_id): Path<Uuid>) -> AppResult<Response> {
    let material_repo = MaterialRepository::new();
    let material = material_repo
        .find_by_id(material_id)
        .await?
        .ok_or(AppError::NotFound("Material"))?;

    let path = resolve_stored_path(FsPath::new(&APP_CONFIG.upload_dir), &material.file);
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(%material_id, file = %material.file, "Stored file is missing");
            return Err(AppError::NotFound("File"));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to read stored file").into()),
    };

    material_repo.record_download(material_id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_name(&material.file).replace('"', "")
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}
