use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One rating per user per material
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::RatingId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rating::MaterialId).uuid().not_null())
                    .col(ColumnDef::new(Rating::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Rating::Score)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(Rating::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_material")
                            .from_tbl(Rating::Table)
                            .from_col(Rating::MaterialId)
                            .to_tbl(Material::Table)
                            .to_col(Material::MaterialId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user")
                            .from_tbl(Rating::Table)
                            .from_col(Rating::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_rating_material_user")
                    .table(Rating::Table)
                    .col(Rating::MaterialId)
                    .col(Rating::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comment::CommentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comment::MaterialId).uuid().not_null())
                    .col(ColumnDef::new(Comment::UserId).uuid().not_null())
                    .col(ColumnDef::new(Comment::Content).text().not_null())
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Comment::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Comment::Upvotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comment::Downvotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comment::IsReported)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_material")
                            .from_tbl(Comment::Table)
                            .from_col(Comment::MaterialId)
                            .to_tbl(Material::Table)
                            .to_col(Material::MaterialId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_user")
                            .from_tbl(Comment::Table)
                            .from_col(Comment::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_material_id")
                    .table(Comment::Table)
                    .col(Comment::MaterialId)
                    .to_owned(),
            )
            .await?;

        // Saved materials are toggled, never duplicated
        manager
            .create_table(
                Table::create()
                    .table(SavedMaterial::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavedMaterial::SavedMaterialId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SavedMaterial::UserId).uuid().not_null())
                    .col(ColumnDef::new(SavedMaterial::MaterialId).uuid().not_null())
                    .col(
                        ColumnDef::new(SavedMaterial::SavedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(ColumnDef::new(SavedMaterial::Note).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_material_user")
                            .from_tbl(SavedMaterial::Table)
                            .from_col(SavedMaterial::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_material_material")
                            .from_tbl(SavedMaterial::Table)
                            .from_col(SavedMaterial::MaterialId)
                            .to_tbl(Material::Table)
                            .to_col(Material::MaterialId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_saved_material_user_material")
                    .table(SavedMaterial::Table)
                    .col(SavedMaterial::UserId)
                    .col(SavedMaterial::MaterialId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("unique_saved_material_user_material")
                    .table(SavedMaterial::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_comment_material_id")
                    .table(Comment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("unique_rating_material_user")
                    .table(Rating::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SavedMaterial::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    RatingId,
    MaterialId,
    UserId,
    Score,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    CommentId,
    MaterialId,
    UserId,
    Content,
    CreatedAt,
    UpdatedAt,
    Upvotes,
    Downvotes,
    IsReported,
}

#[derive(DeriveIden)]
enum SavedMaterial {
    Table,
    SavedMaterialId,
    UserId,
    MaterialId,
    SavedAt,
    Note,
}

#[derive(DeriveIden)]
enum Material {
    Table,
    MaterialId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
}
