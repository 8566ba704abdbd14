use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::interaction_result::VoteDirection;
use super::query_helpers::increment;
use super::shared_connection;
use crate::entities::comment;

pub struct CommentRepository {
    db: &'static DatabaseConnection,
}

impl CommentRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        material_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> Result<comment::Model> {
        let now = Utc::now().naive_utc();
        let comment_model = comment::ActiveModel {
            comment_id: Set(Uuid::new_v4()),
            material_id: Set(material_id),
            user_id: Set(user_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
            upvotes: Set(0),
            downvotes: Set(0),
            is_reported: Set(false),
        };

        let result = comment_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn find_for_material(&self, material_id: Uuid) -> Result<Vec<comment::Model>> {
        let comments = comment::Entity::find()
            .filter(comment::Column::MaterialId.eq(material_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(comments)
    }

    pub async fn find_reported(&self) -> Result<Vec<comment::Model>> {
        let comments = comment::Entity::find()
            .filter(comment::Column::IsReported.eq(true))
            .order_by_desc(comment::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(comments)
    }

    pub async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<comment::Model>> {
        let comment = comment::Entity::find_by_id(comment_id).one(self.db).await?;
        Ok(comment)
    }

    pub async fn vote(&self, comment_id: Uuid, direction: VoteDirection) -> Result<bool> {
        let column = match direction {
            VoteDirection::Up => comment::Column::Upvotes,
            VoteDirection::Down => comment::Column::Downvotes,
        };
        let found = increment::<comment::Entity, _>(
            self.db,
            column,
            comment::Column::CommentId.eq(comment_id),
        )
        .await?;
        Ok(found)
    }

    pub async fn report(&self, comment_id: Uuid) -> Result<bool> {
        let result = comment::Entity::update_many()
            .col_expr(comment::Column::IsReported, Expr::value(true))
            .filter(comment::Column::CommentId.eq(comment_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{seed_material, seed_subject, seed_user, test_db};

    #[tokio::test]
    async fn test_votes_and_report() {
        let db = test_db().await;
        let user = seed_user(db, "owner").await;
        let subject = seed_subject(db, "BIO101").await;
        let material = seed_material(db, &user, &subject, "Cell structure").await;
        let repo = CommentRepository::with_connection(db);

        let comment = repo
            .create(material.material_id, user.user_id, "Helpful diagrams".to_string())
            .await
            .unwrap();

        assert!(repo.vote(comment.comment_id, VoteDirection::Up).await.unwrap());
        assert!(repo.vote(comment.comment_id, VoteDirection::Up).await.unwrap());
        assert!(repo.vote(comment.comment_id, VoteDirection::Down).await.unwrap());
        assert!(repo.report(comment.comment_id).await.unwrap());

        let stored = repo.find_by_id(comment.comment_id).await.unwrap().unwrap();
        assert_eq!((stored.upvotes, stored.downvotes), (2, 1));
        assert!(stored.is_reported);
        assert_eq!(repo.find_reported().await.unwrap().len(), 1);

        assert!(!repo.vote(Uuid::new_v4(), VoteDirection::Up).await.unwrap());
    }
}
