use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 255))
                    .col(text_null(Movies::Description))
                    .col(text_null(Movies::Plot))
                    .col(text_null(Movies::Actors))
                    .col(double(Movies::Rating).default(0.0))
                    // JSON array of {text, date}
                    .col(text_null(Movies::Reviews))
                    .col(string_len_null(Movies::PosterUrl, 500))
                    .col(big_integer(Movies::CreatedAt))
                    .col(big_integer(Movies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    Plot,
    Actors,
    Rating,
    Reviews,
    PosterUrl,
    CreatedAt,
    UpdatedAt,
}
