use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resources::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resources::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Resources::ResourceType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Resources::Description).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accesses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accesses::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_groups_name")
                    .table(Groups::Table)
                    .col(Groups::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccessResources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessResources::AccessId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessResources::ResourceId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccessResources::AccessId)
                            .col(AccessResources::ResourceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccessResources::Table, AccessResources::AccessId)
                            .to(Accesses::Table, Accesses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccessResources::Table, AccessResources::ResourceId)
                            .to(Resources::Table, Resources::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroupAccesses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupAccesses::GroupId).integer().not_null())
                    .col(ColumnDef::new(GroupAccesses::AccessId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(GroupAccesses::GroupId)
                            .col(GroupAccesses::AccessId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupAccesses::Table, GroupAccesses::GroupId)
                            .to(Groups::Table, Groups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupAccesses::Table, GroupAccesses::AccessId)
                            .to(Accesses::Table, Accesses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Conflicts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Conflicts::GroupId1).integer().not_null())
                    .col(ColumnDef::new(Conflicts::GroupId2).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Conflicts::GroupId1)
                            .col(Conflicts::GroupId2),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Conflicts::Table, Conflicts::GroupId1)
                            .to(Groups::Table, Groups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Conflicts::Table, Conflicts::GroupId2)
                            .to(Groups::Table, Groups::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Conflicts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupAccesses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccessResources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accesses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Resources {
    Table,
    Id,
    Name,
    ResourceType,
    Description,
}

#[derive(DeriveIden)]
enum Accesses {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum AccessResources {
    Table,
    AccessId,
    ResourceId,
}

#[derive(DeriveIden)]
enum GroupAccesses {
    Table,
    GroupId,
    AccessId,
}

#[derive(DeriveIden)]
enum Conflicts {
    Table,
    GroupId1,
    GroupId2,
}
