use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPermissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserPermissions::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(UserPermissions::PermissionType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserPermissions::ItemId).integer().not_null())
                    .col(ColumnDef::new(UserPermissions::ItemName).string_len(100))
                    .col(
                        ColumnDef::new(UserPermissions::Status)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserPermissions::RequestId).uuid().not_null())
                    .col(ColumnDef::new(UserPermissions::AssignedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserPermissions::Table, UserPermissions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one row per (user, kind, item).
        manager
            .create_index(
                Index::create()
                    .name("ux_user_permissions_triple")
                    .table(UserPermissions::Table)
                    .col(UserPermissions::UserId)
                    .col(UserPermissions::PermissionType)
                    .col(UserPermissions::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_user_permissions_request_id")
                    .table(UserPermissions::Table)
                    .col(UserPermissions::RequestId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum UserPermissions {
    Table,
    Id,
    UserId,
    PermissionType,
    ItemId,
    ItemName,
    Status,
    RequestId,
    AssignedAt,
}
