use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AboutContent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AboutContent::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AboutContent::Section)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AboutContent::Title).string_len(255).null())
                    .col(ColumnDef::new(AboutContent::Content).text().null())
                    .col(
                        ColumnDef::new(AboutContent::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMembers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TeamMembers::Role).string_len(255).null())
                    .col(ColumnDef::new(TeamMembers::Bio).text().null())
                    .col(ColumnDef::new(TeamMembers::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(TeamMembers::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TeamMembers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TeamMembers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AboutContent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AboutContent {
    Table,
    Id,
    Section,
    Title,
    Content,
    UpdatedAt,
}

#[derive(Iden)]
enum TeamMembers {
    Table,
    Id,
    Name,
    Role,
    Bio,
    ImageUrl,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
