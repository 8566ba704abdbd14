use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};

use super::dto::{SEARCH_LIMIT, SearchQuery, SearchResponse};
use crate::error::AppResult;
use crate::repositories::{MaterialRepository, PostRepository, SubjectRepository};

pub fn create_route() -> Router {
    Router::new().route("/api/v1/search", get(search))
}

/// Case-insensitive search over materials, posts and subjects
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Search"
)]
pub async fn search(
    Query(params): Query<SearchQuery>,
) -> AppResult<(StatusCode, Json<SearchResponse>)> {
    let query = params.q.unwrap_or_default();

    let materials = MaterialRepository::new()
        .search(&query, SEARCH_LIMIT)
        .await?;
    let posts = PostRepository::new().search(&query, SEARCH_LIMIT).await?;
    let subjects = SubjectRepository::new()
        .search(&query, SEARCH_LIMIT)
        .await?;

    tracing::debug!(query = %query, materials = materials.len(), posts = posts.len(), "Search");

    let response = SearchResponse {
        query,
        materials: materials.into_iter().map(Into::into).collect(),
        posts: posts.into_iter().map(Into::into).collect(),
        subjects: subjects.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}
