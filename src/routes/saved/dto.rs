use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{material, saved_material};
use crate::routes::materials::dto::MaterialResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedMaterialResponse {
    pub saved_material_id: Uuid,
    pub material_id: Uuid,
    pub saved_at: NaiveDateTime,
    pub note: Option<String>,
    pub material: Option<MaterialResponse>,
}

impl From<(saved_material::Model, Option<material::Model>)> for SavedMaterialResponse {
    fn from((saved, material): (saved_material::Model, Option<material::Model>)) -> Self {
        Self {
            saved_material_id: saved.saved_material_id,
            material_id: saved.material_id,
            saved_at: saved.saved_at,
            note: saved.note,
            material: material.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedMaterialListResponse {
    pub total: usize,
    pub saved_materials: Vec<SavedMaterialResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateNoteRequest {
    /// Blank clears the note
    #[schema(example = "Read before the midterm")]
    pub note: Option<String>,
}

impl UpdateNoteRequest {
    pub fn cleaned_note(self) -> Option<String> {
        self.note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_note_is_cleared() {
        let request = UpdateNoteRequest {
            note: Some("   ".to_string()),
        };
        assert_eq!(request.cleaned_note(), None);

        let request = UpdateNoteRequest {
            note: Some(" chapter 4 ".to_string()),
        };
        assert_eq!(request.cleaned_note().as_deref(), Some("chapter 4"));
    }
}
