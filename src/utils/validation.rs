//! Field-level form validation.
//!
//! Handlers collect every problem with a submission into [`FormErrors`] and
//! reject it as a whole, so a client sees all failing fields at once.

use std::collections::BTreeMap;

use serde::Serialize;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Message for a choice field whose submitted `value` is not an option.
pub fn invalid_choice(value: &str) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

/// Passwords rejected outright regardless of length.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "11111111",
    "abc12345",
    "letmein1",
    "welcome1",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Records "required" when `value` is blank. Returns whether it was present.
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
            false
        } else {
            true
        }
    }

    pub fn max_length(&mut self, field: &str, value: &str, max: usize) {
        let length = value.chars().count();
        if length > max {
            self.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {length})."),
            );
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Applies the password strength rules, reporting failures under `field`.
pub fn validate_password_strength(errors: &mut FormErrors, field: &str, password: &str) {
    if password.chars().count() < 8 {
        errors.add(
            field,
            "This password is too short. It must contain at least 8 characters.",
        );
    }
    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        errors.add(field, "This password is too common.");
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_messages_per_field() {
        let mut errors = FormErrors::new();
        assert!(!errors.require("title", "   "));
        errors.max_length("title", &"x".repeat(201), 200);

        assert_eq!(errors.messages("title").len(), 2);
        assert_eq!(errors.messages("title")[0], REQUIRED);
        assert!(!errors.has("description"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = FormErrors::new();
        errors.add("email", "This email is already registered.");
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["email"][0], "This email is already registered.");
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("student@uni.edu.bd"));
        assert!(!is_valid_email("student@localhost"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a b@uni.edu"));
        assert!(!is_valid_email("@uni.edu"));
    }

    #[test]
    fn test_password_strength() {
        let mut errors = FormErrors::new();
        validate_password_strength(&mut errors, "password1", "12345678");
        assert!(errors.messages("password1").iter().any(|m| m.contains("numeric")));
        assert!(errors.messages("password1").iter().any(|m| m.contains("common")));

        let mut errors = FormErrors::new();
        validate_password_strength(&mut errors, "password1", "short1");
        assert!(errors.messages("password1")[0].contains("too short"));

        let mut errors = FormErrors::new();
        validate_password_strength(&mut errors, "password1", "Str0ng-enough");
        assert!(errors.is_empty());
    }
}
