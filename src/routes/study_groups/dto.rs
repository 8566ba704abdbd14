use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::study_group::{self, DEFAULT_MAX_MEMBERS};
use crate::routes::auth::dto::UserResponse;
use crate::utils::validation::{FormErrors, invalid_choice};

#[derive(Debug, Serialize, ToSchema)]
pub struct StudyGroupResponse {
    pub study_group_id: Uuid,
    pub name: String,
    pub description: String,
    pub subject_id: Uuid,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub is_public: bool,
    pub max_members: i32,
}

impl From<study_group::Model> for StudyGroupResponse {
    fn from(group: study_group::Model) -> Self {
        Self {
            study_group_id: group.study_group_id,
            name: group.name,
            description: group.description,
            subject_id: group.subject_id,
            created_by: group.created_by,
            created_at: group.created_at,
            is_public: group.is_public,
            max_members: group.max_members,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudyGroupListResponse {
    pub total: usize,
    pub study_groups: Vec<StudyGroupResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudyGroupDetailResponse {
    pub study_group: StudyGroupResponse,
    pub members: Vec<UserResponse>,
    pub member_count: u64,
    /// Whether the signed-in user belongs to the group
    pub is_member: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateStudyGroupRequest {
    #[schema(example = "Algorithms night owls")]
    pub name: String,

    pub description: String,

    /// Subject id
    pub subject: String,

    /// Defaults to true
    pub is_public: Option<bool>,

    /// Defaults to 10
    #[schema(example = 10)]
    pub max_members: Option<i32>,
}

pub struct CleanStudyGroup {
    pub name: String,
    pub description: String,
    pub subject_id: Uuid,
    pub is_public: bool,
    pub max_members: i32,
}

impl CreateStudyGroupRequest {
    pub fn clean(&self) -> Result<CleanStudyGroup, FormErrors> {
        let mut errors = FormErrors::new();

        if errors.require("name", &self.name) {
            errors.max_length("name", self.name.trim(), 200);
        }
        errors.require("description", &self.description);

        let max_members = self.max_members.unwrap_or(DEFAULT_MAX_MEMBERS);
        if max_members < 1 {
            errors.add("max_members", "Ensure this value is greater than or equal to 1.");
        }

        let mut subject_id = None;
        if errors.require("subject", &self.subject) {
            match Uuid::parse_str(self.subject.trim()) {
                Ok(id) => subject_id = Some(id),
                Err(_) => errors.add("subject", invalid_choice(self.subject.trim())),
            }
        }

        match subject_id {
            Some(subject_id) if errors.is_empty() => Ok(CleanStudyGroup {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                subject_id,
                is_public: self.is_public.unwrap_or(true),
                max_members,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = CreateStudyGroupRequest {
            name: "Calculus crew".to_string(),
            description: "Weekly problem sets".to_string(),
            subject: Uuid::new_v4().to_string(),
            ..Default::default()
        };
        let clean = request.clean().ok().unwrap();
        assert!(clean.is_public);
        assert_eq!(clean.max_members, 10);
    }

    #[test]
    fn test_max_members_must_be_positive() {
        let request = CreateStudyGroupRequest {
            name: "Calculus crew".to_string(),
            description: "Weekly problem sets".to_string(),
            subject: Uuid::new_v4().to_string(),
            max_members: Some(0),
            ..Default::default()
        };
        let errors = request.clean().err().unwrap();
        assert!(errors.has("max_members"));
    }
}
