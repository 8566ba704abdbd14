use axum::{
    Json, Router,
    http::StatusCode,
    response::Redirect,
    routing::get,
};

use super::dto::{ProfileResponse, UpdateProfileRequest};
use crate::error::{AppError, AppResult};
use crate::extractor::AuthClaims;
use crate::repositories::{
    DepartmentRepository, MaterialRepository, PostRepository, ProfileRepository, ProfileUpdate,
    SavedMaterialRepository, UserRepository,
};
use crate::routes::saved::dto::SavedMaterialResponse;
use crate::utils::validation::{FormErrors, INVALID_CHOICE};

pub fn create_route() -> Router {
    Router::new().route("/api/v1/profile", get(get_profile).put(update_profile))
}

/// Current user's profile with their uploads, saved materials and posts
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile retrieved", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    AuthClaims(auth_claims): AuthClaims,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let user_id = auth_claims.sub;

    let user = UserRepository::new()
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let profile = ProfileRepository::new()
        .find_by_user_id(user_id)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;

    let materials = MaterialRepository::new().find_by_uploader(user_id).await?;
    let saved = SavedMaterialRepository::new().find_by_user(user_id).await?;
    let posts = PostRepository::new().find_by_user(user_id).await?;

    let response = ProfileResponse {
        user: user.into(),
        profile: profile.into(),
        materials: materials.into_iter().map(Into::into).collect(),
        saved_materials: saved.into_iter().map(SavedMaterialResponse::from).collect(),
        posts: posts.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Edit the current user's profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 303, description = "Profile updated, redirect to profile"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Redirect> {
    let clean = payload.clean()?;

    if let Some(department_id) = clean.department_id {
        if DepartmentRepository::new()
            .find_by_id(department_id)
            .await?
            .is_none()
        {
            let mut errors = FormErrors::new();
            errors.add("department", INVALID_CHOICE);
            return Err(errors.into());
        }
    }

    ProfileRepository::new()
        .update(
            auth_claims.sub,
            ProfileUpdate {
                bio: clean.bio,
                cgpa: clean.cgpa,
                credits_completed: clean.credits_completed,
                department_id: clean.department_id,
                is_studying: clean.is_studying,
            },
        )
        .await?
        .ok_or(AppError::NotFound("Profile"))?;

    tracing::info!(user_id = %auth_claims.sub, "Profile updated");
    Ok(Redirect::to("/api/v1/profile"))
}
