//! `SeaORM` Entity for profile table

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

pub const CGPA_MIN: f64 = 0.0;
pub const CGPA_MAX: f64 = 4.0;
pub const DEFAULT_IMAGE: &str = "default.jpg";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub profile_id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub image: String,
    pub bio: Option<String>,
    pub cgpa: Option<f64>,
    pub credits_completed: i32,
    pub department_id: Option<Uuid>,
    pub is_studying: bool,
    pub reputation: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::DepartmentId",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Department,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModel {
    /// A blank profile as created alongside a new user.
    pub fn for_user(user_id: Uuid) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            profile_id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            image: Set(DEFAULT_IMAGE.to_string()),
            bio: Set(None),
            cgpa: Set(None),
            credits_completed: Set(0),
            department_id: Set(None),
            is_studying: Set(false),
            reputation: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

pub fn cgpa_in_range(cgpa: f64) -> bool {
    (CGPA_MIN..=CGPA_MAX).contains(&cgpa)
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(Some(cgpa)) | ActiveValue::Unchanged(Some(cgpa)) = &self.cgpa {
            if !cgpa_in_range(*cgpa) {
                return Err(DbErr::Custom(format!(
                    "cgpa {cgpa} is outside [{CGPA_MIN}, {CGPA_MAX}]"
                )));
            }
        }
        if !insert {
            self.updated_at = Set(Utc::now().naive_utc());
        }
        Ok(self)
    }
}
