use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::interaction_result::JoinResult;
use super::shared_connection;
use crate::entities::{study_group, study_group_member, user};

pub struct NewStudyGroup {
    pub name: String,
    pub description: String,
    pub subject_id: Uuid,
    pub created_by: Uuid,
    pub is_public: bool,
    pub max_members: i32,
}

pub struct StudyGroupRepository {
    db: &'static DatabaseConnection,
}

impl StudyGroupRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    /// Public groups, newest first.
    pub async fn find_public(&self, limit: Option<u64>) -> Result<Vec<study_group::Model>> {
        let groups = study_group::Entity::find()
            .filter(study_group::Column::IsPublic.eq(true))
            .order_by_desc(study_group::Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await?;
        Ok(groups)
    }

    pub async fn find_by_id(&self, study_group_id: Uuid) -> Result<Option<study_group::Model>> {
        let group = study_group::Entity::find_by_id(study_group_id)
            .one(self.db)
            .await?;
        Ok(group)
    }

    /// Creates the group with its creator as the first member.
    pub async fn create(&self, new_group: NewStudyGroup) -> Result<study_group::Model> {
        let now = Utc::now().naive_utc();
        let group_model = study_group::ActiveModel {
            study_group_id: Set(Uuid::new_v4()),
            name: Set(new_group.name),
            description: Set(new_group.description),
            subject_id: Set(new_group.subject_id),
            created_by: Set(new_group.created_by),
            created_at: Set(now),
            is_public: Set(new_group.is_public),
            max_members: Set(new_group.max_members),
        };

        let txn = self.db.begin().await?;
        let group = group_model.insert(&txn).await?;
        study_group_member::ActiveModel {
            study_group_id: Set(group.study_group_id),
            user_id: Set(new_group.created_by),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(group)
    }

    /// Adds the user to the group's members if there is room.
    ///
    /// The capacity check runs before the membership check, so a member of a
    /// full group also gets [`JoinResult::Full`]. `None` when the group does
    /// not exist.
    pub async fn join(&self, study_group_id: Uuid, user_id: Uuid) -> Result<Option<JoinResult>> {
        let txn = self.db.begin().await?;

        // row lock serializes concurrent joins on postgres
        let Some(group) = study_group::Entity::find_by_id(study_group_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        let members = count_members(&txn, study_group_id).await?;
        if members >= u64::try_from(group.max_members).unwrap_or(0) {
            txn.rollback().await?;
            return Ok(Some(JoinResult::Full));
        }

        let inserted = study_group_member::Entity::insert(study_group_member::ActiveModel {
            study_group_id: Set(study_group_id),
            user_id: Set(user_id),
            joined_at: Set(Utc::now().naive_utc()),
        })
        .on_conflict(
            OnConflict::columns([
                study_group_member::Column::StudyGroupId,
                study_group_member::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
        txn.commit().await?;

        Ok(Some(if inserted == 0 {
            JoinResult::AlreadyMember
        } else {
            JoinResult::Joined
        }))
    }

    pub async fn member_count(&self, study_group_id: Uuid) -> Result<u64> {
        count_members(self.db, study_group_id).await
    }

    pub async fn is_member(&self, study_group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let count = study_group_member::Entity::find()
            .filter(study_group_member::Column::StudyGroupId.eq(study_group_id))
            .filter(study_group_member::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_members(&self, study_group_id: Uuid) -> Result<Vec<user::Model>> {
        let members = study_group_member::Entity::find()
            .find_also_related(user::Entity)
            .filter(study_group_member::Column::StudyGroupId.eq(study_group_id))
            .order_by_asc(study_group_member::Column::JoinedAt)
            .all(self.db)
            .await?
            .into_iter()
            .filter_map(|(_, user)| user)
            .collect();
        Ok(members)
    }
}

async fn count_members<C: ConnectionTrait>(db: &C, study_group_id: Uuid) -> Result<u64> {
    let count = study_group_member::Entity::find()
        .filter(study_group_member::Column::StudyGroupId.eq(study_group_id))
        .count(db)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{seed_subject, seed_user, test_db};

    async fn seed_group(
        db: &'static DatabaseConnection,
        creator: &user::Model,
        max_members: i32,
    ) -> study_group::Model {
        let subject = seed_subject(db, "CSE330").await;
        StudyGroupRepository::with_connection(db)
            .create(NewStudyGroup {
                name: "Numerical methods crew".to_string(),
                description: "Weekly problem solving".to_string(),
                subject_id: subject.subject_id,
                created_by: creator.user_id,
                is_public: true,
                max_members,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_creator_is_first_member() {
        let db = test_db().await;
        let creator = seed_user(db, "creator").await;
        let group = seed_group(db, &creator, 10).await;
        let repo = StudyGroupRepository::with_connection(db);

        assert_eq!(repo.member_count(group.study_group_id).await.unwrap(), 1);
        assert!(repo.is_member(group.study_group_id, creator.user_id).await.unwrap());
        let members = repo.find_members(group.study_group_id).await.unwrap();
        assert_eq!(members[0].username, "creator");
    }

    #[tokio::test]
    async fn test_join_fails_once_full() {
        let db = test_db().await;
        let creator = seed_user(db, "creator").await;
        let second = seed_user(db, "second").await;
        let third = seed_user(db, "third").await;
        let group = seed_group(db, &creator, 2).await;
        let repo = StudyGroupRepository::with_connection(db);

        assert_eq!(
            repo.join(group.study_group_id, second.user_id).await.unwrap(),
            Some(JoinResult::Joined)
        );
        assert_eq!(
            repo.join(group.study_group_id, third.user_id).await.unwrap(),
            Some(JoinResult::Full)
        );
        // capacity is checked before membership
        assert_eq!(
            repo.join(group.study_group_id, second.user_id).await.unwrap(),
            Some(JoinResult::Full)
        );
        assert_eq!(repo.member_count(group.study_group_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_join_is_noop() {
        let db = test_db().await;
        let creator = seed_user(db, "creator").await;
        let group = seed_group(db, &creator, 10).await;
        let repo = StudyGroupRepository::with_connection(db);

        assert_eq!(
            repo.join(group.study_group_id, creator.user_id).await.unwrap(),
            Some(JoinResult::AlreadyMember)
        );
        assert_eq!(repo.member_count(group.study_group_id).await.unwrap(), 1);
        assert_eq!(repo.join(Uuid::new_v4(), creator.user_id).await.unwrap(), None);
    }
}
