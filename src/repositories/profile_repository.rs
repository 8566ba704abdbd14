use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::shared_connection;
use crate::entities::profile;

/// Editable profile fields; every field is replaced.
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub cgpa: Option<f64>,
    pub credits_completed: i32,
    pub department_id: Option<Uuid>,
    pub is_studying: bool,
}

pub struct ProfileRepository {
    db: &'static DatabaseConnection,
}

impl ProfileRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<profile::Model>> {
        let profile = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;
        Ok(profile)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        updates: ProfileUpdate,
    ) -> Result<Option<profile::Model>> {
        let Some(profile) = self.find_by_user_id(user_id).await? else {
            return Ok(None);
        };

        let mut active_model: profile::ActiveModel = profile.into();
        active_model.bio = Set(updates.bio);
        active_model.cgpa = Set(updates.cgpa);
        active_model.credits_completed = Set(updates.credits_completed);
        active_model.department_id = Set(updates.department_id);
        active_model.is_studying = Set(updates.is_studying);

        let result = active_model.update(self.db).await?;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{seed_user, test_db};

    fn update_with_cgpa(cgpa: Option<f64>) -> ProfileUpdate {
        ProfileUpdate {
            bio: Some("Third year CSE".to_string()),
            cgpa,
            credits_completed: 90,
            department_id: None,
            is_studying: true,
        }
    }

    #[tokio::test]
    async fn test_update_profile() {
        let db = test_db().await;
        let user = seed_user(db, "tania").await;
        let repo = ProfileRepository::with_connection(db);

        let updated = repo
            .update(user.user_id, update_with_cgpa(Some(3.75)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.cgpa, Some(3.75));
        assert_eq!(updated.credits_completed, 90);
        assert!(updated.is_studying);
    }

    #[tokio::test]
    async fn test_out_of_range_cgpa_rejected_at_storage() {
        let db = test_db().await;
        let user = seed_user(db, "tania").await;
        let repo = ProfileRepository::with_connection(db);

        assert!(repo.update(user.user_id, update_with_cgpa(Some(4.5))).await.is_err());

        let stored = repo.find_by_user_id(user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.cgpa, None);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let db = test_db().await;
        let repo = ProfileRepository::with_connection(db);
        assert!(repo.update(Uuid::new_v4(), update_with_cgpa(None)).await.unwrap().is_none());
    }
}
