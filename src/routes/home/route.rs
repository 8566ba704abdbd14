use axum::{Json, Router, http::StatusCode, routing::get};

use super::dto::{HomeResponse, RECENT_MATERIALS, RECENT_POSTS, RECENT_STUDY_GROUPS};
use crate::error::AppResult;
use crate::repositories::{MaterialFilter, MaterialRepository, PostRepository, StudyGroupRepository};

pub fn create_route() -> Router {
    Router::new()
        .route("/", get(get_home))
        .route("/api/v1/home", get(get_home))
}

/// Newest approved materials, unreported posts and public study groups
#[utoipa::path(
    get,
    path = "/api/v1/home",
    responses(
        (status = 200, description = "Home feed retrieved", body = HomeResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Home"
)]
pub async fn get_home() -> AppResult<(StatusCode, Json<HomeResponse>)> {
    let materials = MaterialRepository::new()
        .find_approved(&MaterialFilter::default(), Some(RECENT_MATERIALS))
        .await?;
    let posts = PostRepository::new().find_recent(RECENT_POSTS).await?;
    let groups = StudyGroupRepository::new()
        .find_public(Some(RECENT_STUDY_GROUPS))
        .await?;

    let response = HomeResponse {
        recent_materials: materials.into_iter().map(Into::into).collect(),
        recent_posts: posts.into_iter().map(Into::into).collect(),
        study_groups: groups.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}
