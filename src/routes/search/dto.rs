use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::routes::materials::dto::MaterialResponse;
use crate::routes::posts::dto::PostResponse;
use crate::routes::subjects::dto::SubjectResponse;

pub const SEARCH_LIMIT: u64 = 10;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Blank matches everything
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub materials: Vec<MaterialResponse>,
    pub posts: Vec<PostResponse>,
    pub subjects: Vec<SubjectResponse>,
}
