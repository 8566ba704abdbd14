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
use crate::entities::post_comment;

pub struct PostCommentRepository {
    db: &'static DatabaseConnection,
}

impl PostCommentRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> Result<post_comment::Model> {
        let now = Utc::now().naive_utc();
        let comment_model = post_comment::ActiveModel {
            post_comment_id: Set(Uuid::new_v4()),
            post_id: Set(post_id),
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

    /// Replies shown on a post; reported ones are left out.
    pub async fn find_visible_for_post(&self, post_id: Uuid) -> Result<Vec<post_comment::Model>> {
        let comments = post_comment::Entity::find()
            .filter(post_comment::Column::PostId.eq(post_id))
            .filter(post_comment::Column::IsReported.eq(false))
            .order_by_asc(post_comment::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(comments)
    }

    pub async fn vote(&self, post_comment_id: Uuid, direction: VoteDirection) -> Result<bool> {
        let column = match direction {
            VoteDirection::Up => post_comment::Column::Upvotes,
            VoteDirection::Down => post_comment::Column::Downvotes,
        };
        let found = increment::<post_comment::Entity, _>(
            self.db,
            column,
            post_comment::Column::PostCommentId.eq(post_comment_id),
        )
        .await?;
        Ok(found)
    }

    pub async fn report(&self, post_comment_id: Uuid) -> Result<bool> {
        let result = post_comment::Entity::update_many()
            .col_expr(post_comment::Column::IsReported, Expr::value(true))
            .filter(post_comment::Column::PostCommentId.eq(post_comment_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find_by_id(&self, post_comment_id: Uuid) -> Result<Option<post_comment::Model>> {
        let comment = post_comment::Entity::find_by_id(post_comment_id)
            .one(self.db)
            .await?;
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::PostType;
    use crate::repositories::test_support::{seed_user, test_db};
    use crate::repositories::{NewPost, PostRepository};

    #[tokio::test]
    async fn test_reported_replies_are_hidden() {
        let db = test_db().await;
        let user = seed_user(db, "poster").await;
        let post = PostRepository::with_connection(db)
            .create(NewPost {
                user_id: user.user_id,
                title: "Study tips".to_string(),
                content: "Share yours".to_string(),
                post_type: PostType::Discussion,
                subject_id: None,
                tags: String::new(),
            })
            .await
            .unwrap();
        let repo = PostCommentRepository::with_connection(db);

        let kept = repo
            .create(post.post_id, user.user_id, "Pomodoro works".to_string())
            .await
            .unwrap();
        let rude = repo
            .create(post.post_id, user.user_id, "rude reply".to_string())
            .await
            .unwrap();
        assert!(repo.report(rude.post_comment_id).await.unwrap());
        assert!(repo.vote(kept.post_comment_id, VoteDirection::Up).await.unwrap());

        let visible = repo.find_visible_for_post(post.post_id).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].post_comment_id, kept.post_comment_id);
        assert_eq!(visible[0].upvotes, 1);
    }
}
