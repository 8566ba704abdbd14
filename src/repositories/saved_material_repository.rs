use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::interaction_result::SaveToggleResult;
use super::shared_connection;
use crate::entities::{material, saved_material};

pub struct SavedMaterialRepository {
    db: &'static DatabaseConnection,
}

impl SavedMaterialRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    /// Saves the material for the user, or removes it if already saved.
    pub async fn toggle(&self, user_id: Uuid, material_id: Uuid) -> Result<SaveToggleResult> {
        let removed = saved_material::Entity::delete_many()
            .filter(saved_material::Column::UserId.eq(user_id))
            .filter(saved_material::Column::MaterialId.eq(material_id))
            .exec(self.db)
            .await?;
        if removed.rows_affected > 0 {
            return Ok(SaveToggleResult::Removed);
        }

        self.insert(user_id, material_id).await
    }

    async fn insert(&self, user_id: Uuid, material_id: Uuid) -> Result<SaveToggleResult> {
        let saved_model = saved_material::ActiveModel {
            saved_material_id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            material_id: Set(material_id),
            saved_at: Set(Utc::now().naive_utc()),
            note: Set(None),
        };

        match saved_model.insert(self.db).await {
            Ok(_) => Ok(SaveToggleResult::Saved),
            // a concurrent toggle saved it first
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(SaveToggleResult::Saved)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn is_saved(&self, user_id: Uuid, material_id: Uuid) -> Result<bool> {
        let count = saved_material::Entity::find()
            .filter(saved_material::Column::UserId.eq(user_id))
            .filter(saved_material::Column::MaterialId.eq(material_id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    /// The user's saved materials, most recently saved first.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(saved_material::Model, Option<material::Model>)>> {
        let saved = saved_material::Entity::find()
            .find_also_related(material::Entity)
            .filter(saved_material::Column::UserId.eq(user_id))
            .order_by_desc(saved_material::Column::SavedAt)
            .all(self.db)
            .await?;
        Ok(saved)
    }

    pub async fn update_note(
        &self,
        user_id: Uuid,
        material_id: Uuid,
        note: Option<String>,
    ) -> Result<Option<saved_material::Model>> {
        let Some(saved) = saved_material::Entity::find()
            .filter(saved_material::Column::UserId.eq(user_id))
            .filter(saved_material::Column::MaterialId.eq(material_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: saved_material::ActiveModel = saved.into();
        active_model.note = Set(note);
        let result = active_model.update(self.db).await?;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{seed_material, seed_subject, seed_user, test_db};

    #[tokio::test]
    async fn test_toggle_twice_returns_to_not_saved() {
        let db = test_db().await;
        let user = seed_user(db, "owner").await;
        let subject = seed_subject(db, "ECO101").await;
        let material = seed_material(db, &user, &subject, "Supply and demand").await;
        let repo = SavedMaterialRepository::with_connection(db);

        assert_eq!(
            repo.toggle(user.user_id, material.material_id).await.unwrap(),
            SaveToggleResult::Saved
        );
        assert!(repo.is_saved(user.user_id, material.material_id).await.unwrap());

        assert_eq!(
            repo.toggle(user.user_id, material.material_id).await.unwrap(),
            SaveToggleResult::Removed
        );
        assert!(!repo.is_saved(user.user_id, material.material_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_racing_an_existing_save_counts_as_saved() {
        let db = test_db().await;
        let user = seed_user(db, "owner").await;
        let subject = seed_subject(db, "ECO101").await;
        let material = seed_material(db, &user, &subject, "Supply and demand").await;
        let repo = SavedMaterialRepository::with_connection(db);

        saved_material::ActiveModel {
            saved_material_id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            material_id: Set(material.material_id),
            saved_at: Set(Utc::now().naive_utc()),
            note: Set(Some("saved elsewhere".to_string())),
        }
        .insert(db)
        .await
        .unwrap();

        assert_eq!(
            repo.insert(user.user_id, material.material_id).await.unwrap(),
            SaveToggleResult::Saved
        );
        let listed = repo.find_by_user(user.user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0.note.as_deref(), Some("saved elsewhere"));
    }

    #[tokio::test]
    async fn test_note_edit_and_listing() {
        let db = test_db().await;
        let user = seed_user(db, "owner").await;
        let subject = seed_subject(db, "ECO101").await;
        let material = seed_material(db, &user, &subject, "Supply and demand").await;
        let repo = SavedMaterialRepository::with_connection(db);

        assert!(repo
            .update_note(user.user_id, material.material_id, Some("exam".to_string()))
            .await
            .unwrap()
            .is_none());

        repo.toggle(user.user_id, material.material_id).await.unwrap();
        let updated = repo
            .update_note(user.user_id, material.material_id, Some("Chapter 3 for midterm".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.note.as_deref(), Some("Chapter 3 for midterm"));

        let listed = repo.find_by_user(user.user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].1.as_ref().map(|m| m.title.as_str()),
            Some("Supply and demand")
        );
    }
}
