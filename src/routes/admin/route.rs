use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::AdminDashboardResponse;
use crate::error::{AppError, AppResult};
use crate::extractor::SuperuserClaims;
use crate::repositories::{CommentRepository, MaterialRepository, PostRepository};

const DASHBOARD_PATH: &str = "/api/v1/admin/dashboard";

pub fn create_route() -> Router {
    Router::new()
        .route(DASHBOARD_PATH, get(get_dashboard))
        .route(
            "/api/v1/admin/materials/{material_id}/approve",
            post(approve_material),
        )
        .route("/api/v1/admin/posts/{post_id}/pin", post(toggle_post_pin))
}

/// Moderation queue (superuser only)
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Moderation queue", body = AdminDashboardResponse),
        (status = 303, description = "Not a superuser, redirect home"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_dashboard(
    SuperuserClaims(_auth_claims): SuperuserClaims,
) -> AppResult<(StatusCode, Json<AdminDashboardResponse>)> {
    let pending = MaterialRepository::new().find_pending().await?;
    let posts = PostRepository::new().find_reported().await?;
    let comments = CommentRepository::new().find_reported().await?;

    let response = AdminDashboardResponse {
        pending_materials: pending.into_iter().map(Into::into).collect(),
        reported_posts: posts.into_iter().map(Into::into).collect(),
        reported_comments: comments.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/materials/{material_id}/approve",
    params(
        ("material_id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 303, description = "Material approved, redirect to the dashboard"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_material(
    SuperuserClaims(auth_claims): SuperuserClaims,
    Path(material_id): Path<Uuid>,
) -> AppResult<Redirect> {
    if !MaterialRepository::new().approve(material_id).await? {
        return Err(AppError::NotFound("Material"));
    }

    tracing::info!(%material_id, approved_by = %auth_claims.sub, "Material approved");
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// Pin or unpin a post
#[utoipa::path(
    post,
    path = "/api/v1/admin/posts/{post_id}/pin",
    params(
        ("post_id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 303, description = "Pin toggled, redirect to the dashboard"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_post_pin(
    SuperuserClaims(auth_claims): SuperuserClaims,
    Path(post_id): Path<Uuid>,
) -> AppResult<Redirect> {
    let post = PostRepository::new()
        .toggle_pin(post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    tracing::info!(%post_id, is_pinned = post.is_pinned, by = %auth_claims.sub, "Post pin toggled");
    Ok(Redirect::to(DASHBOARD_PATH))
}
