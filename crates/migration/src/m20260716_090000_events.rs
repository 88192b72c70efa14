use sea_orm_migration::prelude::*;

use crate::m20260715_090000_cities::Cities;
use crate::m20260715_091000_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Events {
    Table,
    Id,
    Title,
    Description,
    EventType,
    DatetimeStart,
    DatetimeEnd,
    Address,
    CityId,
    OrganizerId,
    LimitParticipants,
    Status,
    RegistrationSeq,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).string())
                    .col(ColumnDef::new(Events::EventType).string())
                    .col(
                        ColumnDef::new(Events::DatetimeStart)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::DatetimeEnd).timestamp())
                    .col(ColumnDef::new(Events::Address).string().not_null())
                    .col(ColumnDef::new(Events::CityId).integer().not_null())
                    .col(ColumnDef::new(Events::OrganizerId).integer().not_null())
                    .col(ColumnDef::new(Events::LimitParticipants).integer())
                    .col(ColumnDef::new(Events::Status).string().not_null())
                    .col(
                        ColumnDef::new(Events::RegistrationSeq)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Events::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-city_id")
                            .from(Events::Table, Events::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-organizer_id")
                            .from(Events::Table, Events::OrganizerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-datetime_start")
                    .table(Events::Table)
                    .col(Events::DatetimeStart)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}
