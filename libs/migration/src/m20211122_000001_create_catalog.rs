use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::CategoryId))
                    .col(string_len(Categories::CategoryName, 64))
                    .col(integer(Categories::CategoryStatus).default(1))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::ProductId))
                    .col(string_len_null(Products::ProductName, 128))
                    .col(decimal_len_null(Products::UnitPrice, 18, 2))
                    .col(integer_null(Products::UnitInStock))
                    .col(string_len(Products::ProductPicture, 256).default("noimg.jpg"))
                    .col(integer(Products::CategoryId))
                    .col(
                        timestamp_with_time_zone(Products::CreatedDate)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Products::ModifiedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::CategoryId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    CategoryId,
    CategoryName,
    CategoryStatus,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    ProductId,
    ProductName,
    UnitPrice,
    UnitInStock,
    ProductPicture,
    CategoryId,
    CreatedDate,
    ModifiedDate,
}
