use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::interaction_result::VoteDirection;
use super::query_helpers::{icontains_any, increment, normalize_query};
use super::shared_connection;
use crate::entities::post;
use crate::entities::sea_orm_active_enums::PostType;

const SEARCH_COLUMNS: [post::Column; 3] = [
    post::Column::Title,
    post::Column::Content,
    post::Column::Tags,
];

pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub post_type: PostType,
    pub subject_id: Option<Uuid>,
    pub tags: String,
}

#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub post_type: Option<PostType>,
    pub query: Option<String>,
}

pub struct PostRepository {
    db: &'static DatabaseConnection,
}

impl PostRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    /// Unreported posts matching `filter`, pinned first, then newest first.
    pub async fn find_visible(&self, filter: &PostFilter) -> Result<Vec<post::Model>> {
        let mut query = post::Entity::find().filter(post::Column::IsReported.eq(false));

        if let Some(post_type) = filter.post_type {
            query = query.filter(post::Column::PostType.eq(post_type));
        }
        if let Some(text) = normalize_query(filter.query.as_deref()) {
            query = query.filter(icontains_any(&SEARCH_COLUMNS, text));
        }

        let posts = query
            .order_by_desc(post::Column::IsPinned)
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(posts)
    }

    pub async fn find_recent(&self, limit: u64) -> Result<Vec<post::Model>> {
        let posts = post::Entity::find()
            .filter(post::Column::IsReported.eq(false))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await?;
        Ok(posts)
    }

    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<post::Model>> {
        let mut select = post::Entity::find().filter(post::Column::IsReported.eq(false));
        if let Some(text) = normalize_query(Some(query)) {
            select = select.filter(icontains_any(&SEARCH_COLUMNS, text));
        }
        let posts = select
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await?;
        Ok(posts)
    }

    pub async fn find_by_id(&self, post_id: Uuid) -> Result<Option<post::Model>> {
        let post = post::Entity::find_by_id(post_id).one(self.db).await?;
        Ok(post)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<post::Model>> {
        let posts = post::Entity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(posts)
    }

    pub async fn find_reported(&self) -> Result<Vec<post::Model>> {
        let posts = post::Entity::find()
            .filter(post::Column::IsReported.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(posts)
    }

    pub async fn create(&self, new_post: NewPost) -> Result<post::Model> {
        let now = Utc::now().naive_utc();
        let post_model = post::ActiveModel {
            post_id: Set(Uuid::new_v4()),
            user_id: Set(new_post.user_id),
            title: Set(new_post.title),
            content: Set(new_post.content),
            post_type: Set(new_post.post_type),
            subject_id: Set(new_post.subject_id),
            tags: Set(new_post.tags),
            created_at: Set(now),
            updated_at: Set(now),
            upvotes: Set(0),
            downvotes: Set(0),
            is_reported: Set(false),
            is_pinned: Set(false),
        };

        let result = post_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn vote(&self, post_id: Uuid, direction: VoteDirection) -> Result<bool> {
        let column = match direction {
            VoteDirection::Up => post::Column::Upvotes,
            VoteDirection::Down => post::Column::Downvotes,
        };
        let found =
            increment::<post::Entity, _>(self.db, column, post::Column::PostId.eq(post_id)).await?;
        Ok(found)
    }

    pub async fn report(&self, post_id: Uuid) -> Result<bool> {
        let result = post::Entity::update_many()
            .col_expr(post::Column::IsReported, Expr::value(true))
            .filter(post::Column::PostId.eq(post_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Flips the pinned flag and returns the updated post.
    pub async fn toggle_pin(&self, post_id: Uuid) -> Result<Option<post::Model>> {
        let result = post::Entity::update_many()
            .col_expr(post::Column::IsPinned, Expr::col(post::Column::IsPinned).not())
            .filter(post::Column::PostId.eq(post_id))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(post_id).await
    }
}
