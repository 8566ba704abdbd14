use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::shared_connection;
use crate::entities::department;

pub struct DepartmentRepository {
    db: &'static DatabaseConnection,
}

impl DepartmentRepository {
    pub fn new() -> Self {
        Self::with_connection(shared_connection())
    }

    pub fn with_connection(db: &'static DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<department::Model>> {
        let departments = department::Entity::find()
            .order_by_asc(department::Column::Code)
            .all(self.db)
            .await?;
        Ok(departments)
    }

    pub async fn find_by_id(&self, department_id: Uuid) -> Result<Option<department::Model>> {
        let department = department::Entity::find_by_id(department_id)
            .one(self.db)
            .await?;
        Ok(department)
    }

    pub async fn create(&self, code: String, name: String) -> Result<department::Model> {
        let department_model = department::ActiveModel {
            department_id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(name),
        };

        let result = department_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn update(
        &self,
        department_id: Uuid,
        updates: DepartmentUpdate,
    ) -> Result<Option<department::Model>> {
        let Some(department) = self.find_by_id(department_id).await? else {
            return Ok(None);
        };

        let mut active_model: department::ActiveModel = department.into();

        if let Some(code) = updates.code {
            active_model.code = Set(code);
        }
        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }

        let result = active_model.update(self.db).await?;
        Ok(Some(result))
    }

    /// Deleting a department cascades to its subjects.
    pub async fn delete(&self, department_id: Uuid) -> Result<bool> {
        let result = department::Entity::delete_by_id(department_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

pub struct DepartmentUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
}
