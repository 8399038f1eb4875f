use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactInfo::Phone).string_len(20).null())
                    .col(ColumnDef::new(ContactInfo::Email).string_len(255).null())
                    .col(ColumnDef::new(ContactInfo::Address).text().null())
                    .col(
                        ColumnDef::new(ContactInfo::UpdatedAt)
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
            .drop_table(Table::drop().table(ContactInfo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContactInfo {
    Table,
    Id,
    Phone,
    Email,
    Address,
    UpdatedAt,
}
