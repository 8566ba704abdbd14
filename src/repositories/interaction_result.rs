use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingResult {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveToggleResult {
    Saved,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinResult {
    Joined,
    AlreadyMember,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl RatingResult {
    pub fn message(&self) -> &'static str {
        "Rating submitted successfully!"
    }
}

impl SaveToggleResult {
    pub fn message(&self) -> &'static str {
        match self {
            SaveToggleResult::Saved => "Material saved successfully!",
            SaveToggleResult::Removed => "Material removed from saved list.",
        }
    }
}

impl JoinResult {
    pub fn is_member(&self) -> bool {
        !matches!(self, JoinResult::Full)
    }

    pub fn message(&self) -> &'static str {
        match self {
            JoinResult::Joined => "You have joined the study group!",
            JoinResult::AlreadyMember => "You are already a member of this study group.",
            JoinResult::Full => "Study group is full!",
        }
    }
}
