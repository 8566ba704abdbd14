use sea_orm::DatabaseConnection;

use super::{
    DepartmentRepository, MaterialRepository, NewMaterial, NewSubject, NewUser,
    SubjectRepository, UserRepository,
};
use crate::entities::sea_orm_active_enums::MaterialType;
use crate::entities::{material, subject, user};
use crate::static_service::connect;

/// A fresh, migrated in-memory database for one test.
pub async fn test_db() -> &'static DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("in-memory database should migrate");
    Box::leak(Box::new(db))
}

pub async fn seed_user(db: &'static DatabaseConnection, username: &str) -> user::Model {
    UserRepository::with_connection(db)
        .create(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: username.to_string(),
            last_name: "Test".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            is_superuser: false,
        })
        .await
        .expect("seed user")
}

/// Creates a subject with the given code under its own department.
pub async fn seed_subject(db: &'static DatabaseConnection, code: &str) -> subject::Model {
    let department = DepartmentRepository::with_connection(db)
        .create(code[..3].to_string(), format!("{} department", &code[..3]))
        .await
        .expect("seed department");

    SubjectRepository::with_connection(db)
        .create(NewSubject {
            name: format!("{code} course"),
            code: code.to_string(),
            department_id: department.department_id,
            description: None,
        })
        .await
        .expect("seed subject")
}

pub async fn seed_material(
    db: &'static DatabaseConnection,
    uploader: &user::Model,
    subject: &subject::Model,
    title: &str,
) -> material::Model {
    MaterialRepository::with_connection(db)
        .create(NewMaterial {
            title: title.to_string(),
            description: format!("{title} for {}", subject.code),
            file: "materials/2025/01/01/seed_file.pdf".to_string(),
            uploaded_by: uploader.user_id,
            subject_id: subject.subject_id,
            material_type: MaterialType::Note,
            tags: String::new(),
        })
        .await
        .expect("seed material")
}
