use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::subject;
use crate::utils::validation::{FormErrors, INVALID_CHOICE};

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub subject_id: Uuid,
    pub name: String,
    pub code: String,
    pub department_id: Uuid,
    pub description: Option<String>,
}

impl From<subject::Model> for SubjectResponse {
    fn from(subject: subject::Model) -> Self {
        Self {
            subject_id: subject.subject_id,
            name: subject.name,
            code: subject.code,
            department_id: subject.department_id,
            description: subject.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectListResponse {
    pub total: usize,
    pub subjects: Vec<SubjectResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectListQuery {
    /// Only subjects of this department
    pub department: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateSubjectRequest {
    #[schema(example = "Data Structures")]
    pub name: String,

    #[schema(example = "CSE220")]
    pub code: String,

    /// Department id
    pub department: String,

    pub description: Option<String>,
}

impl CreateSubjectRequest {
    /// Field checks; returns the parsed department id when it is well formed.
    pub fn validate(&self) -> (FormErrors, Option<Uuid>) {
        let mut errors = FormErrors::new();
        if errors.require("name", &self.name) {
            errors.max_length("name", self.name.trim(), 200);
        }
        if errors.require("code", &self.code) {
            errors.max_length("code", self.code.trim(), 20);
        }

        let mut department_id = None;
        if errors.require("department", &self.department) {
            match Uuid::parse_str(self.department.trim()) {
                Ok(id) => department_id = Some(id),
                Err(_) => errors.add("department", INVALID_CHOICE),
            }
        }
        (errors, department_id)
    }
}
