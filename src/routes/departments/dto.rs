use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::department;
use crate::routes::subjects::dto::SubjectResponse;
use crate::utils::validation::FormErrors;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateDepartmentRequest {
    #[schema(example = "CSE")]
    pub code: String,

    #[schema(example = "Computer Science and Engineering")]
    pub name: String,
}

impl CreateDepartmentRequest {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        if errors.require("code", &self.code) {
            errors.max_length("code", self.code.trim(), 10);
        }
        if errors.require("name", &self.name) {
            errors.max_length("name", self.name.trim(), 100);
        }
        errors
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateDepartmentRequest {
    pub code: Option<String>,
    pub name: Option<String>,
}

impl UpdateDepartmentRequest {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        if let Some(code) = &self.code {
            if errors.require("code", code) {
                errors.max_length("code", code.trim(), 10);
            }
        }
        if let Some(name) = &self.name {
            if errors.require("name", name) {
                errors.max_length("name", name.trim(), 100);
            }
        }
        errors
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub department_id: Uuid,
    pub code: String,
    pub name: String,
}

impl From<department::Model> for DepartmentResponse {
    fn from(department: department::Model) -> Self {
        Self {
            department_id: department.department_id,
            code: department.code,
            name: department.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentListResponse {
    pub total: usize,
    pub departments: Vec<DepartmentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentDetailResponse {
    pub department: DepartmentResponse,
    pub subjects: Vec<SubjectResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_limit() {
        let request = CreateDepartmentRequest {
            code: "COMPUTERSCI".to_string(),
            name: "Computer Science".to_string(),
        };
        assert!(request.validate().has("code"));
    }

    #[test]
    fn test_update_rejects_blank_values_only_when_present() {
        let request = UpdateDepartmentRequest {
            code: None,
            name: Some(" ".to_string()),
        };
        let errors = request.validate();
        assert!(errors.has("name"));
        assert!(!errors.has("code"));
    }
}
