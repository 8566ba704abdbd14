use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudyGroup::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyGroup::StudyGroupId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudyGroup::Name).string_len(200).not_null())
                    .col(ColumnDef::new(StudyGroup::Description).text().not_null())
                    .col(ColumnDef::new(StudyGroup::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(StudyGroup::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(StudyGroup::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(StudyGroup::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(StudyGroup::MaxMembers)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_group_subject")
                            .from_tbl(StudyGroup::Table)
                            .from_col(StudyGroup::SubjectId)
                            .to_tbl(Subject::Table)
                            .to_col(Subject::SubjectId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_group_created_by")
                            .from_tbl(StudyGroup::Table)
                            .from_col(StudyGroup::CreatedBy)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Membership set: the composite key makes a duplicate join a no-op
        manager
            .create_table(
                Table::create()
                    .table(StudyGroupMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyGroupMember::StudyGroupId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudyGroupMember::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(StudyGroupMember::JoinedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .primary_key(
                        Index::create()
                            .col(StudyGroupMember::StudyGroupId)
                            .col(StudyGroupMember::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_group_member_group")
                            .from_tbl(StudyGroupMember::Table)
                            .from_col(StudyGroupMember::StudyGroupId)
                            .to_tbl(StudyGroup::Table)
                            .to_col(StudyGroup::StudyGroupId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_group_member_user")
                            .from_tbl(StudyGroupMember::Table)
                            .from_col(StudyGroupMember::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudyGroupMember::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudyGroup::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum StudyGroup {
    Table,
    StudyGroupId,
    Name,
    Description,
    SubjectId,
    CreatedBy,
    CreatedAt,
    IsPublic,
    MaxMembers,
}

#[derive(DeriveIden)]
enum StudyGroupMember {
    Table,
    StudyGroupId,
    UserId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    SubjectId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
}
