use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;

use super::shared_connection;
use crate::entities::user;

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

pub struct UserRepository {
    db: &'static DatabaseConnection,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>> {
        let user = user::Entity::find_by_id(user_id).one(self.db).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await?;
        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    /// Inserts the user; its profile is created in the same transaction.
    pub async fn create(&self, new_user: NewUser) -> Result<user::Model> {
        let now = Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            user_id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password: Set(new_user.password_hash),
            is_superuser: Set(new_user.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = self.db.begin().await?;
        let user = user_model.insert(&txn).await?;
        txn.commit().await?;
        Ok(user)
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let result = user::Entity::delete_by_id(user_id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{material, profile};
    use crate::repositories::test_support::{seed_material, seed_subject, seed_user, test_db};

    #[tokio::test]
    async fn test_creating_user_creates_exactly_one_profile() {
        let db = test_db().await;
        let user = seed_user(db, "farhan").await;

        let profiles = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user.user_id))
            .all(db)
            .await
            .unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].image, profile::DEFAULT_IMAGE);
        assert_eq!(profiles[0].credits_completed, 0);
    }

    #[tokio::test]
    async fn test_username_and_email_lookups() {
        let db = test_db().await;
        seed_user(db, "farhan").await;
        let repo = UserRepository::with_connection(db);

        assert!(repo.username_exists("farhan").await.unwrap());
        assert!(!repo.username_exists("someone").await.unwrap());
        assert!(repo.email_exists("farhan@example.com").await.unwrap());
        assert!(repo.find_by_username("farhan").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected_by_store() {
        let db = test_db().await;
        seed_user(db, "farhan").await;
        let repo = UserRepository::with_connection(db);

        let result = repo
            .create(NewUser {
                username: "farhan".to_string(),
                email: "other@example.com".to_string(),
                first_name: "F".to_string(),
                last_name: "H".to_string(),
                password_hash: "x".to_string(),
                is_superuser: false,
            })
            .await;
        assert!(result.is_err());
        assert_eq!(profile::Entity::find().count(db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_profile_and_uploads() {
        let db = test_db().await;
        let user = seed_user(db, "farhan").await;
        let subject = seed_subject(db, "CSE110").await;
        seed_material(db, &user, &subject, "Intro slides").await;
        let repo = UserRepository::with_connection(db);

        assert!(repo.delete(user.user_id).await.unwrap());
        assert!(!repo.delete(user.user_id).await.unwrap());

        assert_eq!(profile::Entity::find().count(db).await.unwrap(), 0);
        assert_eq!(material::Entity::find().count(db).await.unwrap(), 0);
    }
}
