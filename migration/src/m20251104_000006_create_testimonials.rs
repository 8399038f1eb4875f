use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Testimonials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Testimonials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Testimonials::ClientName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Testimonials::ClientRole).string_len(255).null())
                    .col(ColumnDef::new(Testimonials::ProjectType).string_len(255).null())
                    .col(ColumnDef::new(Testimonials::Content).text().not_null())
                    .col(
                        ColumnDef::new(Testimonials::Rating)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(Testimonials::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(Testimonials::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Testimonials::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Testimonials::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Testimonials::UpdatedAt)
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
            .drop_table(Table::drop().table(Testimonials::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Testimonials {
    Table,
    Id,
    ClientName,
    ClientRole,
    ProjectType,
    Content,
    Rating,
    ImageUrl,
    IsPublished,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
