//! Vote and report actions on material comments and post replies.

use axum::{Json, Router, extract::Path, response::Redirect, routing::post};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extractor::AuthClaims;
use crate::repositories::{CommentRepository, PostCommentRepository};
use crate::routes::posts::dto::VoteRequest;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/comments/{comment_id}/vote", post(vote_comment))
        .route("/api/v1/comments/{comment_id}/report", post(report_comment))
        .route(
            "/api/v1/post-comments/{post_comment_id}/vote",
            post(vote_post_comment),
        )
        .route(
            "/api/v1/post-comments/{post_comment_id}/report",
            post(report_post_comment),
        )
}

#[utoipa::path(
    post,
    path = "/api/v1/comments/{comment_id}/vote",
    params(
        ("comment_id" = Uuid, Path, description = "Material comment ID")
    ),
    request_body = VoteRequest,
    responses(
        (status = 303, description = "Vote counted, redirect to the material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn vote_comment(
    AuthClaims(_auth_claims): AuthClaims,
    Path(comment_id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> AppResult<Redirect> {
    let comment_repo = CommentRepository::new();
    let comment = comment_repo
        .find_by_id(comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    comment_repo.vote(comment_id, payload.direction).await?;
    Ok(Redirect::to(&format!(
        "/api/v1/materials/{}",
        comment.material_id
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/comments/{comment_id}/report",
    params(
        ("comment_id" = Uuid, Path, description = "Material comment ID")
    ),
    responses(
        (status = 303, description = "Comment reported, redirect to the material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn report_comment(
    AuthClaims(auth_claims): AuthClaims,
    Path(comment_id): Path<Uuid>,
) -> AppResult<Redirect> {
    let comment_repo = CommentRepository::new();
    let comment = comment_repo
        .find_by_id(comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    comment_repo.report(comment_id).await?;
    tracing::warn!(%comment_id, reported_by = %auth_claims.sub, "Comment reported");
    Ok(Redirect::to(&format!(
        "/api/v1/materials/{}",
        comment.material_id
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/post-comments/{post_comment_id}/vote",
    params(
        ("post_comment_id" = Uuid, Path, description = "Post reply ID")
    ),
    request_body = VoteRequest,
    responses(
        (status = 303, description = "Vote counted, redirect to the post"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reply not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn vote_post_comment(
    AuthClaims(_auth_claims): AuthClaims,
    Path(post_comment_id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> AppResult<Redirect> {
    let repo = PostCommentRepository::new();
    let reply = repo
        .find_by_id(post_comment_id)
        .await?
        .ok_or(AppError::NotFound("Post comment"))?;

    repo.vote(post_comment_id, payload.direction).await?;
    Ok(Redirect::to(&format!("/api/v1/posts/{}", reply.post_id)))
}

/// Flag a reply; it is hidden from the post from then on
#[utoipa::path(
    post,
    path = "/api/v1/post-comments/{post_comment_id}/report",
    params(
        ("post_comment_id" = Uuid, Path, description = "Post reply ID")
    ),
    responses(
        (status = 303, description = "Reply reported, redirect to the post"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reply not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn report_post_comment(
    AuthClaims(auth_claims): AuthClaims,
    Path(post_comment_id): Path<Uuid>,
) -> AppResult<Redirect> {
    let repo = PostCommentRepository::new();
    let reply = repo
        .find_by_id(post_comment_id)
        .await?
        .ok_or(AppError::NotFound("Post comment"))?;

    repo.report(post_comment_id).await?;
    tracing::warn!(%post_comment_id, reported_by = %auth_claims.sub, "Post comment reported");
    Ok(Redirect::to(&format!("/api/v1/posts/{}", reply.post_id)))
}
