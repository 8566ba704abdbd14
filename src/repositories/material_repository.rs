use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::query_helpers::{icontains_any, increment, normalize_query};
use super::shared_connection;
use crate::entities::material;
use crate::entities::sea_orm_active_enums::MaterialType;

const SEARCH_COLUMNS: [material::Column; 3] = [
    material::Column::Title,
    material::Column::Description,
    material::Column::Tags,
];

pub struct NewMaterial {
    pub title: String,
    pub description: String,
    pub file: String,
    pub uploaded_by: Uuid,
    pub subject_id: Uuid,
    pub material_type: MaterialType,
    pub tags: String,
}

pub struct MaterialUpdate {
    pub title: String,
    pub description: String,
    pub subject_id: Uuid,
    pub material_type: MaterialType,
    pub tags: String,
}

/// Filters of the material list. Absent filters do not restrict.
#[derive(Debug, Default, Clone)]
pub struct MaterialFilter {
    pub subject_id: Option<Uuid>,
    pub material_type: Option<MaterialType>,
    pub query: Option<String>,
}

pub struct MaterialRepository {
    db: &'static DatabaseConnection,
}

impl MaterialRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    /// Approved materials matching `filter`, newest first.
    pub async fn find_approved(
        &self,
        filter: &MaterialFilter,
        limit: Option<u64>,
    ) -> Result<Vec<material::Model>> {
        let mut query = material::Entity::find().filter(material::Column::IsApproved.eq(true));

        if let Some(subject_id) = filter.subject_id {
            query = query.filter(material::Column::SubjectId.eq(subject_id));
        }
        if let Some(material_type) = filter.material_type {
            query = query.filter(material::Column::MaterialType.eq(material_type));
        }
        if let Some(text) = normalize_query(filter.query.as_deref()) {
            query = query.filter(icontains_any(&SEARCH_COLUMNS, text));
        }

        let materials = query
            .order_by_desc(material::Column::UploadDate)
            .limit(limit)
            .all(self.db)
            .await?;
        Ok(materials)
    }

    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<material::Model>> {
        let filter = MaterialFilter {
            query: Some(query.to_string()),
            ..Default::default()
        };
        self.find_approved(&filter, Some(limit)).await
    }

    pub async fn find_by_id(&self, material_id: Uuid) -> Result<Option<material::Model>> {
        let material = material::Entity::find_by_id(material_id)
            .one(self.db)
            .await?;
        Ok(material)
    }

    pub async fn find_by_uploader(&self, user_id: Uuid) -> Result<Vec<material::Model>> {
        let materials = material::Entity::find()
            .filter(material::Column::UploadedBy.eq(user_id))
            .order_by_desc(material::Column::UploadDate)
            .all(self.db)
            .await?;
        Ok(materials)
    }

    pub async fn find_pending(&self) -> Result<Vec<material::Model>> {
        let materials = material::Entity::find()
            .filter(material::Column::IsApproved.eq(false))
            .order_by_asc(material::Column::UploadDate)
            .all(self.db)
            .await?;
        Ok(materials)
    }

    pub async fn create(&self, new_material: NewMaterial) -> Result<material::Model> {
        let material_model = material::ActiveModel {
            material_id: Set(Uuid::new_v4()),
            title: Set(new_material.title),
            description: Set(new_material.description),
            file: Set(new_material.file),
            uploaded_by: Set(new_material.uploaded_by),
            subject_id: Set(new_material.subject_id),
            material_type: Set(new_material.material_type),
            tags: Set(new_material.tags),
            upload_date: Set(Utc::now().naive_utc()),
            is_approved: Set(true),
            reports: Set(0),
            downloads: Set(0),
            views: Set(0),
        };

        let result = material_model.insert(self.db).await?;
        Ok(result)
    }

    async fn find_owned(&self, material_id: Uuid, owner: Uuid) -> Result<Option<material::Model>> {
        let material = material::Entity::find_by_id(material_id)
            .filter(material::Column::UploadedBy.eq(owner))
            .one(self.db)
            .await?;
        Ok(material)
    }

    /// Updates a material uploaded by `owner`; `None` when there is no such material.
    pub async fn update_owned(
        &self,
        material_id: Uuid,
        owner: Uuid,
        updates: MaterialUpdate,
    ) -> Result<Option<material::Model>> {
        let Some(material) = self.find_owned(material_id, owner).await? else {
            return Ok(None);
        };

        let mut active_model: material::ActiveModel = material.into();
        active_model.title = Set(updates.title);
        active_model.description = Set(updates.description);
        active_model.subject_id = Set(updates.subject_id);
        active_model.material_type = Set(updates.material_type);
        active_model.tags = Set(updates.tags);

        let result = active_model.update(self.db).await?;
        Ok(Some(result))
    }

    /// Deletes a material uploaded by `owner` and returns the removed row.
    pub async fn delete_owned(
        &self,
        material_id: Uuid,
        owner: Uuid,
    ) -> Result<Option<material::Model>> {
        let Some(material) = self.find_owned(material_id, owner).await? else {
            return Ok(None);
        };

        material::Entity::delete_by_id(material.material_id)
            .exec(self.db)
            .await?;
        Ok(Some(material))
    }

    /// Counts one view and returns the material as it is after the increment.
    pub async fn record_view(&self, material_id: Uuid) -> Result<Option<material::Model>> {
        if !increment::<material::Entity, _>(
            self.db,
            material::Column::Views,
            material::Column::MaterialId.eq(material_id),
        )
        .await?
        {
            return Ok(None);
        }
        self.find_by_id(material_id).await
    }

    pub async fn record_download(&self, material_id: Uuid) -> Result<Option<material::Model>> {
        if !increment::<material::Entity, _>(
            self.db,
            material::Column::Downloads,
            material::Column::MaterialId.eq(material_id),
        )
        .await?
        {
            return Ok(None);
        }
        self.find_by_id(material_id).await
    }

    pub async fn report(&self, material_id: Uuid) -> Result<bool> {
        let found = increment::<material::Entity, _>(
            self.db,
            material::Column::Reports,
            material::Column::MaterialId.eq(material_id),
        )
        .await?;
        Ok(found)
    }

    pub async fn approve(&self, material_id: Uuid) -> Result<bool> {
        let result = material::Entity::update_many()
            .col_expr(material::Column::IsApproved, Expr::value(true))
            .filter(material::Column::MaterialId.eq(material_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{comment, rating, saved_material};
    use crate::repositories::test_support::{seed_material, seed_subject, seed_user, test_db};
    use crate::repositories::{CommentRepository, RatingRepository, SavedMaterialRepository};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_views_increase_by_one_per_request() {
        let db = test_db().await;
        let user = seed_user(db, "rafi").await;
        let subject = seed_subject(db, "PHY111").await;
        let material = seed_material(db, &user, &subject, "Kinematics notes").await;
        let repo = MaterialRepository::with_connection(db);

        for _ in 0..5 {
            repo.record_view(material.material_id).await.unwrap();
        }
        let stored = repo.find_by_id(material.material_id).await.unwrap().unwrap();
        assert_eq!(stored.views, material.views + 5);

        assert!(repo.record_view(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_query_returns_all_approved() {
        let db = test_db().await;
        let user = seed_user(db, "rafi").await;
        let subject = seed_subject(db, "PHY111").await;
        let other_subject = seed_subject(db, "CHE101").await;
        seed_material(db, &user, &subject, "Kinematics notes").await;
        seed_material(db, &user, &other_subject, "Organic chemistry slides").await;
        let hidden = seed_material(db, &user, &subject, "Draft").await;
        material::Entity::update_many()
            .col_expr(material::Column::IsApproved, Expr::value(false))
            .filter(material::Column::MaterialId.eq(hidden.material_id))
            .exec(db)
            .await
            .unwrap();
        let repo = MaterialRepository::with_connection(db);

        let all = repo.find_approved(&MaterialFilter::default(), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.search("", 10).await.unwrap().len(), 2);

        let by_subject = MaterialFilter {
            subject_id: Some(subject.subject_id),
            ..Default::default()
        };
        assert_eq!(repo.find_approved(&by_subject, None).await.unwrap().len(), 1);

        let by_text = MaterialFilter {
            query: Some("KINEMATICS".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.find_approved(&by_text, None).await.unwrap().len(), 1);

        let by_type = MaterialFilter {
            material_type: Some(MaterialType::Book),
            ..Default::default()
        };
        assert!(repo.find_approved(&by_type, None).await.unwrap().is_empty());

        assert_eq!(repo.find_pending().await.unwrap().len(), 1);
        assert!(repo.approve(hidden.material_id).await.unwrap());
        assert!(repo.find_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let db = test_db().await;
        let owner = seed_user(db, "rafi").await;
        let intruder = seed_user(db, "mallory").await;
        let subject = seed_subject(db, "PHY111").await;
        let material = seed_material(db, &owner, &subject, "Kinematics notes").await;
        let repo = MaterialRepository::with_connection(db);

        let updates = MaterialUpdate {
            title: "Hijacked".to_string(),
            description: String::new(),
            subject_id: subject.subject_id,
            material_type: MaterialType::Other,
            tags: String::new(),
        };
        assert!(repo
            .update_owned(material.material_id, intruder.user_id, updates)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .delete_owned(material.material_id, intruder.user_id)
            .await
            .unwrap()
            .is_none());

        let stored = repo.find_by_id(material.material_id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Kinematics notes");
    }

    #[tokio::test]
    async fn test_delete_cascades_to_interactions() {
        let db = test_db().await;
        let owner = seed_user(db, "rafi").await;
        let reader = seed_user(db, "sumi").await;
        let subject = seed_subject(db, "PHY111").await;
        let material = seed_material(db, &owner, &subject, "Kinematics notes").await;

        RatingRepository::with_connection(db)
            .upsert(material.material_id, reader.user_id, 4)
            .await
            .unwrap();
        CommentRepository::with_connection(db)
            .create(material.material_id, reader.user_id, "Very clear".to_string())
            .await
            .unwrap();
        SavedMaterialRepository::with_connection(db)
            .toggle(reader.user_id, material.material_id)
            .await
            .unwrap();

        let repo = MaterialRepository::with_connection(db);
        let deleted = repo
            .delete_owned(material.material_id, owner.user_id)
            .await
            .unwrap();
        assert!(deleted.is_some());

        assert_eq!(rating::Entity::find().count(db).await.unwrap(), 0);
        assert_eq!(comment::Entity::find().count(db).await.unwrap(), 0);
        assert_eq!(saved_material::Entity::find().count(db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_download_and_report_counters() {
        let db = test_db().await;
        let user = seed_user(db, "rafi").await;
        let subject = seed_subject(db, "PHY111").await;
        let material = seed_material(db, &user, &subject, "Kinematics notes").await;
        let repo = MaterialRepository::with_connection(db);

        let after = repo.record_download(material.material_id).await.unwrap().unwrap();
        assert_eq!(after.downloads, 1);
        assert!(repo.report(material.material_id).await.unwrap());
        assert!(!repo.report(Uuid::new_v4()).await.unwrap());
        let stored = repo.find_by_id(material.material_id).await.unwrap().unwrap();
        assert_eq!(stored.reports, 1);
    }

    #[tokio::test]
    async fn test_search_treats_like_wildcards_literally() {
        let db = test_db().await;
        let user = seed_user(db, "rafi").await;
        let subject = seed_subject(db, "MAT101").await;
        seed_material(db, &user, &subject, "1000 practice problems").await;
        seed_material(db, &user, &subject, "lab1report").await;
        let discount = seed_material(db, &user, &subject, "Grades 100% curved").await;
        let repo = MaterialRepository::with_connection(db);

        let percent = repo.search("100%", 10).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].material_id, discount.material_id);

        assert!(repo.search("lab_", 10).await.unwrap().is_empty());
        assert_eq!(repo.search("lab1", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_keeps_surrounding_whitespace() {
        let db = test_db().await;
        let user = seed_user(db, "rafi").await;
        let subject = seed_subject(db, "MAT101").await;
        seed_material(db, &user, &subject, "Precalculus").await;
        seed_material(db, &user, &subject, "Intro calculus").await;
        let repo = MaterialRepository::with_connection(db);

        assert_eq!(repo.search("calculus", 10).await.unwrap().len(), 2);
        let spaced = repo.search(" calculus", 10).await.unwrap();
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].title, "Intro calculus");
    }
}
