use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::profile::{self, CGPA_MAX, CGPA_MIN};
use crate::routes::auth::dto::UserResponse;
use crate::routes::materials::dto::MaterialResponse;
use crate::routes::posts::dto::PostResponse;
use crate::routes::saved::dto::SavedMaterialResponse;
use crate::utils::validation::{FormErrors, INVALID_CHOICE};

pub const BIO_MAX_LENGTH: usize = 500;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDetail {
    pub profile_id: Uuid,
    pub image: String,
    pub bio: Option<String>,
    pub cgpa: Option<f64>,
    pub credits_completed: i32,
    pub department_id: Option<Uuid>,
    pub is_studying: bool,
    pub reputation: i32,
}

impl From<profile::Model> for ProfileDetail {
    fn from(profile: profile::Model) -> Self {
        Self {
            profile_id: profile.profile_id,
            image: profile.image,
            bio: profile.bio,
            cgpa: profile.cgpa,
            credits_completed: profile.credits_completed,
            department_id: profile.department_id,
            is_studying: profile.is_studying,
            reputation: profile.reputation,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub profile: ProfileDetail,
    pub materials: Vec<MaterialResponse>,
    pub saved_materials: Vec<SavedMaterialResponse>,
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[schema(example = "Third year CSE student")]
    pub bio: Option<String>,

    #[schema(example = 3.62)]
    pub cgpa: Option<f64>,

    #[schema(example = 96)]
    pub credits_completed: Option<i32>,

    /// Department id
    pub department: Option<String>,

    pub is_studying: Option<bool>,
}

/// A profile edit that passed the field checks; the department still has to
/// be looked up.
pub struct CleanProfileUpdate {
    pub bio: Option<String>,
    pub cgpa: Option<f64>,
    pub credits_completed: i32,
    pub department_id: Option<Uuid>,
    pub is_studying: bool,
}


impl UpdateProfileRequest {
    pub fn clean(self) -> Result<CleanProfileUpdate, FormErrors> {
        let mut errors = FormErrors::new();

        let bio = self.bio.filter(|bio| !bio.trim().is_empty());
        if let Some(bio) = &bio {
            errors.max_length("bio", bio, BIO_MAX_LENGTH);
        }

        if let Some(cgpa) = self.cgpa {
            if cgpa > CGPA_MAX {
                errors.add(
                    "cgpa",
                    format!("Ensure this value is less than or equal to {CGPA_MAX:.1}."),
                );
            } else if cgpa < CGPA_MIN {
                errors.add(
                    "cgpa",
                    format!("Ensure this value is greater than or equal to {CGPA_MIN:.1}."),
                );
            }
        }

        let credits_completed = self.credits_completed.unwrap_or(0);
        if credits_completed < 0 {
            errors.add("credits_completed", "Ensure this value is greater than or equal to 0.");
        }

        let department_id = match self.department.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("department", INVALID_CHOICE);
                    None
                }
            },
        };

        errors.into_result()?;

        Ok(CleanProfileUpdate {
            bio,
            cgpa: self.cgpa,
            credits_completed,
            department_id,
            is_studying: self.is_studying.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cgpa_bounds() {
        let too_high = UpdateProfileRequest {
            cgpa: Some(4.5),
            ..Default::default()
        };
        let errors = too_high.clean().err().unwrap();
        assert_eq!(
            errors.messages("cgpa"),
            ["Ensure this value is less than or equal to 4.0.".to_string()]
        );

        let negative = UpdateProfileRequest {
            cgpa: Some(-0.1),
            ..Default::default()
        };
        assert!(negative.clean().err().unwrap().has("cgpa"));

        let edge = UpdateProfileRequest {
            cgpa: Some(4.0),
            ..Default::default()
        };
        assert_eq!(edge.clean().ok().unwrap().cgpa, Some(4.0));
    }

    #[test]
    fn test_bio_length_and_credits() {
        let request = UpdateProfileRequest {
            bio: Some("a".repeat(501)),
            credits_completed: Some(-3),
            department: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        let errors = request.clean().err().unwrap();
        assert!(errors.has("bio"));
        assert!(errors.has("credits_completed"));
        assert_eq!(errors.messages("department"), [INVALID_CHOICE.to_string()]);
    }

    #[test]
    fn test_blank_fields_clean_to_defaults() {
        let clean = UpdateProfileRequest {
            bio: Some("   ".to_string()),
            department: Some(String::new()),
            ..Default::default()
        }
        .clean()
        .ok()
        .unwrap();
        assert_eq!(clean.bio, None);
        assert_eq!(clean.department_id, None);
        assert_eq!(clean.credits_completed, 0);
        assert!(!clean.is_studying);
    }
}
