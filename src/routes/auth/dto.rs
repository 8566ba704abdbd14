use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::user;
use crate::utils::validation::{FormErrors, is_valid_email, validate_password_strength};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "nadia")]
    pub username: String,

    #[schema(example = "nadia@uni.edu")]
    pub email: String,

    #[schema(example = "Nadia")]
    pub first_name: String,

    #[schema(example = "Rahman")]
    pub last_name: String,

    #[schema(example = "Str0ng-passphrase")]
    pub password1: String,

    #[schema(example = "Str0ng-passphrase")]
    pub password2: String,
}

impl RegisterRequest {
    /// Checks everything that does not need the database.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if errors.require("username", &self.username) {
            errors.max_length("username", &self.username, 150);
        }
        if errors.require("email", &self.email) && !is_valid_email(self.email.trim()) {
            errors.add("email", "Enter a valid email address.");
        }
        if errors.require("first_name", &self.first_name) {
            errors.max_length("first_name", &self.first_name, 30);
        }
        if errors.require("last_name", &self.last_name) {
            errors.max_length("last_name", &self.last_name, 30);
        }
        if errors.require("password1", &self.password1) {
            validate_password_strength(&mut errors, "password1", &self.password1);
        }
        if errors.require("password2", &self.password2) && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "nadia")]
    pub username: String,

    #[schema(example = "Str0ng-passphrase")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "nadia".to_string(),
            email: "nadia@uni.edu".to_string(),
            first_name: "Nadia".to_string(),
            last_name: "Rahman".to_string(),
            password1: "Str0ng-passphrase".to_string(),
            password2: "Str0ng-passphrase".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(valid_request().validate().is_empty());
    }

    #[test]
    fn test_mismatched_passwords() {
        let request = RegisterRequest {
            password2: "Different-passphrase".to_string(),
            ..valid_request()
        };
        let errors = request.validate();
        assert_eq!(
            errors.messages("password2"),
            ["The two password fields didn't match.".to_string()]
        );
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = RegisterRequest::default().validate();
        for field in ["username", "email", "first_name", "last_name", "password1", "password2"] {
            assert!(errors.has(field), "{field} should be required");
        }
    }

    #[test]
    fn test_weak_password_and_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password1: "12345678".to_string(),
            password2: "12345678".to_string(),
            ..valid_request()
        };
        let errors = request.validate();
        assert!(errors.has("email"));
        assert!(errors.has("password1"));
        assert!(!errors.has("password2"));
    }
}
