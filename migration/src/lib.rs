pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_table_user_profile;
mod m20250901_000002_create_table_subject_material;
mod m20250902_000003_create_table_material_interaction;
mod m20250903_000004_create_table_post;
mod m20250904_000005_create_table_study_group;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_table_user_profile::Migration),
            Box::new(m20250901_000002_create_table_subject_material::Migration),
            Box::new(m20250902_000003_create_table_material_interaction::Migration),
            Box::new(m20250903_000004_create_table_post::Migration),
            Box::new(m20250904_000005_create_table_study_group::Migration),
        ]
    }
}
