use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};
use uuid::Uuid;

use super::interaction_result::RatingResult;
use super::shared_connection;
use crate::entities::rating;

pub struct RatingRepository {
    db: &'static DatabaseConnection,
}

impl RatingRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records `score` as the user's rating of the material, replacing any
    /// earlier rating. The unique (material, user) index decides the outcome:
    /// an insert that hits it becomes an update of the existing score.
    pub async fn upsert(&self, material_id: Uuid, user_id: Uuid, score: i32) -> Result<RatingResult> {
        let rating_model = rating::ActiveModel {
            rating_id: Set(Uuid::new_v4()),
            material_id: Set(material_id),
            user_id: Set(user_id),
            score: Set(score),
            created_at: Set(Utc::now().naive_utc()),
        };

        match rating::Entity::insert(rating_model)
            .exec_without_returning(self.db)
            .await
        {
            Ok(_) => Ok(RatingResult::Created),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                rating::Entity::update_many()
                    .col_expr(rating::Column::Score, Expr::value(score))
                    .filter(rating::Column::MaterialId.eq(material_id))
                    .filter(rating::Column::UserId.eq(user_id))
                    .exec(self.db)
                    .await?;
                Ok(RatingResult::Updated)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_for_material(&self, material_id: Uuid) -> Result<Vec<rating::Model>> {
        let ratings = rating::Entity::find()
            .filter(rating::Column::MaterialId.eq(material_id))
            .order_by_desc(rating::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(ratings)
    }

    pub async fn find_by_user(
        &self,
        material_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<rating::Model>> {
        let rating = rating::Entity::find()
            .filter(rating::Column::MaterialId.eq(material_id))
            .filter(rating::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;
        Ok(rating)
    }
}

/// Mean score, or 0 when nobody has rated yet.
pub fn average_score(ratings: &[rating::Model]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: i64 = ratings.iter().map(|r| i64::from(r.score)).sum();
    total as f64 / ratings.len() as f64
}
