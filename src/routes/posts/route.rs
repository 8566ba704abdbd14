use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CreatePostRequest, PostDetailResponse, PostListQuery, PostListResponse, VoteRequest,
};
use crate::entities::sea_orm_active_enums::PostType;
use crate::error::{AppError, AppResult};
use crate::extractor::AuthClaims;
use crate::routes::materials::dto::CommentRequest;
use crate::repositories::{
    NewPost, PostCommentRepository, PostFilter, PostRepository, SubjectRepository,
};
use crate::utils::validation::{FormErrors, invalid_choice};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/posts", get(get_posts).post(create_post))
        .route("/api/v1/posts/{post_id}", get(get_post))
        .route("/api/v1/posts/{post_id}/comments", post(add_post_comment))
        .route("/api/v1/posts/{post_id}/vote", post(vote_post))
        .route("/api/v1/posts/{post_id}/report", post(report_post))
}

fn detail_redirect(post_id: Uuid) -> Redirect {
    Redirect::to(&format!("/api/v1/posts/{post_id}"))
}

/// List unreported posts, pinned first then newest first
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts retrieved", body = PostListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Posts"
)]
pub async fn get_posts(
    Query(query): Query<PostListQuery>,
) -> AppResult<(StatusCode, Json<PostListResponse>)> {
    let post_type = query
        .post_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let posts = match post_type.map(PostType::parse) {
        // unknown type matches nothing
        Some(None) => Vec::new(),
        parsed => {
            let filter = PostFilter {
                post_type: parsed.flatten(),
                query: query.q,
            };
            PostRepository::new().find_visible(&filter).await?
        }
    };

    let response = PostListResponse {
        total: posts.len(),
        posts: posts.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Publish a new post
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 303, description = "Post created, redirect to the post list"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation errors by field"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
pub async fn create_post(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreatePostRequest>,
) -> AppResult<Redirect> {
    let clean = payload.clean()?;

    if let Some(subject_id) = clean.subject_id {
        if !SubjectRepository::new().exists(subject_id).await? {
            let mut errors = FormErrors::new();
            errors.add("subject", invalid_choice(&subject_id.to_string()));
            return Err(errors.into());
        }
    }

    let post = PostRepository::new()
        .create(NewPost {
            user_id: auth_claims.sub,
            title: clean.title,
            content: clean.content,
            post_type: clean.post_type,
            subject_id: clean.subject_id,
            tags: clean.tags,
        })
        .await?;

    tracing::info!(post_id = %post.post_id, user_id = %auth_claims.sub, "Post created");
    Ok(Redirect::to("/api/v1/posts"))
}

/// Post with its visible replies
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    params(
        ("post_id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post retrieved", body = PostDetailResponse),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Posts"
)]
pub async fn get_post(
    Path(post_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<PostDetailResponse>)> {
    let post = PostRepository::new()
        .find_by_id(post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;
    let comments = PostCommentRepository::new()
        .find_visible_for_post(post_id)
        .await?;

    let response = PostDetailResponse {
        post: post.into(),
        comments: comments.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments",
    params(
        ("post_id" = Uuid, Path, description = "Post ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 303, description = "Reply added, redirect to the post"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Empty reply"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
pub async fn add_post_comment(
    AuthClaims(auth_claims): AuthClaims,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Redirect> {
    let mut errors = FormErrors::new();
    errors.require("content", &payload.content);
    errors.into_result()?;

    PostRepository::new()
        .find_by_id(post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    PostCommentRepository::new()
        .create(post_id, auth_claims.sub, payload.content.trim().to_string())
        .await?;

    Ok(detail_redirect(post_id))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/vote",
    params(
        ("post_id" = Uuid, Path, description = "Post ID")
    ),
    request_body = VoteRequest,
    responses(
        (status = 303, description = "Vote counted, redirect to the post"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
pub async fn vote_post(
    AuthClaims(_auth_claims): AuthClaims,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> AppResult<Redirect> {
    if !PostRepository::new().vote(post_id, payload.direction).await? {
        return Err(AppError::NotFound("Post"));
    }
    Ok(detail_redirect(post_id))
}

/// Flag a post; it disappears from lists and search
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/report",
    params(
        ("post_id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 303, description = "Post reported, redirect to the post list"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
pub async fn report_post(
    AuthClaims(auth_claims): AuthClaims,
    Path(post_id): Path<Uuid>,
) -> AppResult<Redirect> {
    if !PostRepository::new().report(post_id).await? {
        return Err(AppError::NotFound("Post"));
    }

    tracing::warn!(%post_id, reported_by = %auth_claims.sub, "Post reported");
    Ok(Redirect::to("/api/v1/posts"))
}
