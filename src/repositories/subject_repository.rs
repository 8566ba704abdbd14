use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::query_helpers::{icontains_any, normalize_query};
use super::shared_connection;
use crate::entities::subject;

pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub department_id: Uuid,
    pub description: Option<String>,
}

pub struct SubjectRepository {
    db: &'static DatabaseConnection,
}

impl SubjectRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_all(&self, department_id: Option<Uuid>) -> Result<Vec<subject::Model>> {
        let mut query = subject::Entity::find();
        if let Some(department_id) = department_id {
            query = query.filter(subject::Column::DepartmentId.eq(department_id));
        }
        let subjects = query
            .order_by_asc(subject::Column::Code)
            .all(self.db)
            .await?;
        Ok(subjects)
    }

    pub async fn find_by_id(&self, subject_id: Uuid) -> Result<Option<subject::Model>> {
        let subject = subject::Entity::find_by_id(subject_id).one(self.db).await?;
        Ok(subject)
    }

    pub async fn exists(&self, subject_id: Uuid) -> Result<bool> {
        let count = subject::Entity::find_by_id(subject_id)
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool> {
        let count = subject::Entity::find()
            .filter(subject::Column::Code.eq(code))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, new_subject: NewSubject) -> Result<subject::Model> {
        let subject_model = subject::ActiveModel {
            subject_id: Set(Uuid::new_v4()),
            name: Set(new_subject.name),
            code: Set(new_subject.code),
            department_id: Set(new_subject.department_id),
            description: Set(new_subject.description),
        };

        let result = subject_model.insert(self.db).await?;
        Ok(result)
    }

    /// Subjects whose name, code or description contains `query`.
    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<subject::Model>> {
        let mut select = subject::Entity::find();
        if let Some(text) = normalize_query(Some(query)) {
            select = select.filter(icontains_any(
                &[
                    subject::Column::Name,
                    subject::Column::Code,
                    subject::Column::Description,
                ],
                text,
            ));
        }
        let subjects = select
            .order_by_asc(subject::Column::Code)
            .limit(limit)
            .all(self.db)
            .await?;
        Ok(subjects)
    }
}
