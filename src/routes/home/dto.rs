use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::materials::dto::MaterialResponse;
use crate::routes::posts::dto::PostResponse;
use crate::routes::study_groups::dto::StudyGroupResponse;

pub const RECENT_MATERIALS: u64 = 6;
pub const RECENT_POSTS: u64 = 5;
pub const RECENT_STUDY_GROUPS: u64 = 4;

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub recent_materials: Vec<MaterialResponse>,
    pub recent_posts: Vec<PostResponse>,
    pub study_groups: Vec<StudyGroupResponse>,
}
