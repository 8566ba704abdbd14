use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::PostType;
use crate::entities::{post, post_comment};
use crate::repositories::VoteDirection;
use crate::utils::validation::{FormErrors, invalid_choice};

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub post_type: PostType,
    pub subject_id: Option<Uuid>,
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub upvotes: i32,
    pub downvotes: i32,
    pub is_pinned: bool,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            post_id: post.post_id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            post_type: post.post_type,
            subject_id: post.subject_id,
            tags: post.tags,
            created_at: post.created_at,
            upvotes: post.upvotes,
            downvotes: post.downvotes,
            is_pinned: post.is_pinned,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostCommentResponse {
    pub post_comment_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub upvotes: i32,
    pub downvotes: i32,
}

impl From<post_comment::Model> for PostCommentResponse {
    fn from(comment: post_comment::Model) -> Self {
        Self {
            post_comment_id: comment.post_comment_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    /// Post type (`personal`, `discussion`, `question`, `announcement`, `resource`)
    #[serde(rename = "type")]
    pub post_type: Option<String>,

    /// Case-insensitive match on title, content and tags
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub total: usize,
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<PostCommentResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePostRequest {
    #[schema(example = "Anyone has last year's midterm?")]
    pub title: String,

    pub content: String,

    #[schema(example = "question")]
    pub post_type: String,

    /// Optional subject id
    pub subject: Option<String>,

    pub tags: String,
}

pub struct CleanPost {
    pub title: String,
    pub content: String,
    pub post_type: PostType,
    pub subject_id: Option<Uuid>,
    pub tags: String,
}

impl CreatePostRequest {
    pub fn clean(&self) -> Result<CleanPost, FormErrors> {
        let mut errors = FormErrors::new();

        if errors.require("title", &self.title) {
            errors.max_length("title", self.title.trim(), 200);
        }
        errors.require("content", &self.content);
        errors.max_length("tags", self.tags.trim(), 200);

        let post_type = match self.post_type.trim() {
            "" => PostType::default(),
            value => PostType::parse(value).unwrap_or_else(|| {
                errors.add("post_type", invalid_choice(value));
                PostType::default()
            }),
        };

        let subject_id = match self.subject.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("subject", invalid_choice(raw));
                    None
                }
            },
        };

        errors.into_result()?;

        Ok(CleanPost {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            post_type,
            subject_id,
            tags: self.tags.trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    pub direction: VoteDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_discussion() {
        let request = CreatePostRequest {
            title: "Hello".to_string(),
            content: "First post".to_string(),
            ..Default::default()
        };
        let clean = request.clean().unwrap();
        assert_eq!(clean.post_type, PostType::Discussion);
        assert_eq!(clean.subject_id, None);
    }

    #[test]
    fn test_rejects_unknown_type_and_bad_subject() {
        let request = CreatePostRequest {
            title: "Hello".to_string(),
            content: "First post".to_string(),
            post_type: "rant".to_string(),
            subject: Some("not-a-uuid".to_string()),
            tags: String::new(),
        };
        let errors = request.clean().err().unwrap();
        assert!(errors.has("post_type"));
        assert!(errors.has("subject"));
    }

    #[test]
    fn test_vote_direction_is_lowercase() {
        let vote: VoteRequest = serde_json::from_str(r#"{"direction":"down"}"#).unwrap();
        assert_eq!(vote.direction, VoteDirection::Down);
    }
}
