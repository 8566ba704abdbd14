use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::Redirect,
    routing::{get, put},
};
use uuid::Uuid;

use super::dto::{SavedMaterialListResponse, SavedMaterialResponse, UpdateNoteRequest};
use crate::error::{AppError, AppResult};
use crate::extractor::AuthClaims;
use crate::repositories::SavedMaterialRepository;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/saved", get(get_saved_materials))
        .route("/api/v1/saved/{material_id}/note", put(update_note))
}

/// Materials saved by the current user, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/saved",
    responses(
        (status = 200, description = "Saved materials retrieved", body = SavedMaterialListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Saved"
)]
pub async fn get_saved_materials(
    AuthClaims(auth_claims): AuthClaims,
) -> AppResult<(StatusCode, Json<SavedMaterialListResponse>)> {
    let saved = SavedMaterialRepository::new()
        .find_by_user(auth_claims.sub)
        .await?;

    let response = SavedMaterialListResponse {
        total: saved.len(),
        saved_materials: saved.into_iter().map(SavedMaterialResponse::from).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/v1/saved/{material_id}/note",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 303, description = "Note saved, redirect to the saved list"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material is not in your saved list"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Saved"
)]
pub async fn update_note(
    AuthClaims(auth_claims): AuthClaims,
    Path(material_id): Path<Uuid>,
    Json(payload): Json<UpdateNoteRequest>,
) -> AppResult<Redirect> {
    SavedMaterialRepository::new()
        .update_note(auth_claims.sub, material_id, payload.cleaned_note())
        .await?
        .ok_or(AppError::NotFound("Saved material"))?;

    Ok(Redirect::to("/api/v1/saved"))
}
