use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::materials::dto::{CommentResponse, MaterialResponse};
use crate::routes::posts::dto::PostResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboardResponse {
    /// Materials waiting for approval
    pub pending_materials: Vec<MaterialResponse>,
    pub reported_posts: Vec<PostResponse>,
    pub reported_comments: Vec<CommentResponse>,
}
