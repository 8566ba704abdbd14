use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subject::SubjectId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subject::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Subject::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subject::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Subject::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_department")
                            .from_tbl(Subject::Table)
                            .from_col(Subject::DepartmentId)
                            .to_tbl(Department::Table)
                            .to_col(Department::DepartmentId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Material::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Material::MaterialId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Material::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Material::Description).text().not_null())
                    .col(ColumnDef::new(Material::File).string().not_null())
                    .col(ColumnDef::new(Material::UploadedBy).uuid().not_null())
                    .col(ColumnDef::new(Material::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Material::MaterialType)
                            .string_len(20)
                            .not_null()
                            .default("note"),
                    )
                    .col(
                        ColumnDef::new(Material::Tags)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Material::UploadDate)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Material::IsApproved)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Material::Reports)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Material::Downloads)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Material::Views)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_material_uploaded_by")
                            .from_tbl(Material::Table)
                            .from_col(Material::UploadedBy)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_material_subject")
                            .from_tbl(Material::Table)
                            .from_col(Material::SubjectId)
                            .to_tbl(Subject::Table)
                            .to_col(Subject::SubjectId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_material_subject_id")
                    .table(Material::Table)
                    .col(Material::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_material_uploaded_by")
                    .table(Material::Table)
                    .col(Material::UploadedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_material_uploaded_by")
                    .table(Material::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_material_subject_id")
                    .table(Material::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Material::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    SubjectId,
    Name,
    Code,
    DepartmentId,
    Description,
}

#[derive(DeriveIden)]
enum Material {
    Table,
    MaterialId,
    Title,
    Description,
    File,
    UploadedBy,
    SubjectId,
    MaterialType,
    Tags,
    UploadDate,
    IsApproved,
    Reports,
    Downloads,
    Views,
}

#[derive(DeriveIden)]
enum Department {
    Table,
    DepartmentId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
}
