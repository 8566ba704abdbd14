use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::MaterialType;
use crate::entities::{comment, material, rating};
use crate::routes::subjects::dto::SubjectResponse;
use crate::utils::upload::MultipartForm;
use crate::utils::validation::{FormErrors, invalid_choice};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const TAGS_MAX_LENGTH: usize = 200;

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialResponse {
    pub material_id: Uuid,
    pub title: String,
    pub description: String,
    /// Stored file path, relative to the upload directory
    pub file: String,
    pub uploaded_by: Uuid,
    pub subject_id: Uuid,
    pub material_type: MaterialType,
    pub tags: String,
    pub upload_date: NaiveDateTime,
    pub is_approved: bool,
    pub reports: i32,
    pub downloads: i32,
    pub views: i32,
}

impl From<material::Model> for MaterialResponse {
    fn from(material: material::Model) -> Self {
        Self {
            material_id: material.material_id,
            title: material.title,
            description: material.description,
            file: material.file,
            uploaded_by: material.uploaded_by,
            subject_id: material.subject_id,
            material_type: material.material_type,
            tags: material.tags,
            upload_date: material.upload_date,
            is_approved: material.is_approved,
            reports: material.reports,
            downloads: material.downloads,
            views: material.views,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialListQuery {
    /// Subject id
    pub subject: Option<String>,

    /// Material type (`note`, `slide`, `assignment`, `book`, `question`, `other`)
    #[serde(rename = "type")]
    pub material_type: Option<String>,

    /// Case-insensitive match on title, description and tags
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialListResponse {
    pub total: usize,
    pub materials: Vec<MaterialResponse>,
    /// Every subject, for the filter dropdown
    pub subjects: Vec<SubjectResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub comment_id: Uuid,
    pub material_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub upvotes: i32,
    pub downvotes: i32,
    pub is_reported: bool,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            comment_id: comment.comment_id,
            material_id: comment.material_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            is_reported: comment.is_reported,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub rating_id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub created_at: NaiveDateTime,
}

impl From<rating::Model> for RatingResponse {
    fn from(rating: rating::Model) -> Self {
        Self {
            rating_id: rating.rating_id,
            user_id: rating.user_id,
            score: rating.score,
            created_at: rating.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialDetailResponse {
    pub material: MaterialResponse,
    pub comments: Vec<CommentResponse>,
    pub ratings: Vec<RatingResponse>,
    pub avg_rating: f64,
    /// Whether the signed-in user saved this material
    pub is_saved: bool,
    /// The signed-in user's own score, if any
    pub user_rating: Option<i32>,
}

/// Fields shared by the upload form and the edit request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct MaterialForm {
    #[schema(example = "Week 3 lecture notes")]
    pub title: String,

    pub description: String,

    /// Subject id
    pub subject: String,

    #[schema(example = "note")]
    pub material_type: String,

    #[schema(example = "graphs,bfs")]
    pub tags: String,
}

#[derive(Debug, Clone)]
pub struct CleanMaterialForm {
    pub title: String,
    pub description: String,
    pub subject_id: Uuid,
    pub material_type: MaterialType,
    pub tags: String,
}

impl MaterialForm {
    pub fn from_multipart(form: &MultipartForm) -> Self {
        Self {
            title: form.text("title").to_string(),
            description: form.text("description").to_string(),
            subject: form.text("subject").to_string(),
            material_type: form.text("material_type").to_string(),
            tags: form.text("tags").to_string(),
        }
    }

    /// Field checks that do not need the database. The subject's existence is
    /// checked by the caller.
    pub fn clean(&self) -> Result<CleanMaterialForm, FormErrors> {
        let mut errors = FormErrors::new();

        if errors.require("title", &self.title) {
            errors.max_length("title", self.title.trim(), TITLE_MAX_LENGTH);
        }
        errors.require("description", &self.description);
        errors.max_length("tags", self.tags.trim(), TAGS_MAX_LENGTH);

        let mut subject_id = None;
        if errors.require("subject", &self.subject) {
            match Uuid::parse_str(self.subject.trim()) {
                Ok(id) => subject_id = Some(id),
                Err(_) => errors.add("subject", invalid_choice(self.subject.trim())),
            }
        }

        let material_type = match self.material_type.trim() {
            "" => Some(MaterialType::default()),
            value => {
                let parsed = MaterialType::parse(value);
                if parsed.is_none() {
                    errors.add("material_type", invalid_choice(value));
                }
                parsed
            }
        };

        match (subject_id, material_type) {
            (Some(subject_id), Some(material_type)) if errors.is_empty() => Ok(CleanMaterialForm {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                subject_id,
                material_type,
                tags: self.tags.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RateMaterialRequest {
    /// 1 to 5
    #[schema(example = 4)]
    pub score: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> MaterialForm {
        MaterialForm {
            title: "Graph notes".to_string(),
            description: "BFS and DFS".to_string(),
            subject: Uuid::new_v4().to_string(),
            material_type: String::new(),
            tags: "graphs".to_string(),
        }
    }

    #[test]
    fn test_missing_type_defaults_to_note() {
        let clean = valid_form().clean().unwrap();
        assert_eq!(clean.material_type, MaterialType::Note);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let form = MaterialForm {
            material_type: "invalid_type".to_string(),
            ..valid_form()
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(
            errors.messages("material_type"),
            ["Select a valid choice. invalid_type is not one of the available choices."]
        );
    }

    #[test]
    fn test_required_fields_and_lengths() {
        let form = MaterialForm {
            title: "x".repeat(201),
            description: "  ".to_string(),
            subject: String::new(),
            material_type: "slide".to_string(),
            tags: String::new(),
        };
        let errors = form.clean().unwrap_err();
        assert!(errors.has("title"));
        assert!(errors.has("description"));
        assert!(errors.has("subject"));
        assert!(!errors.has("material_type"));
    }

    #[test]
    fn test_from_multipart_reads_text_fields() {
        let mut multipart = MultipartForm::default();
        multipart
            .fields
            .insert("title".to_string(), "Slides".to_string());
        multipart
            .fields
            .insert("material_type".to_string(), "slide".to_string());

        let form = MaterialForm::from_multipart(&multipart);
        assert_eq!(form.title, "Slides");
        assert_eq!(form.material_type, "slide");
        assert!(form.tags.is_empty());
    }
}
