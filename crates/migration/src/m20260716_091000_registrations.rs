use sea_orm_migration::prelude::*;

use crate::m20260715_091000_users::Users;
use crate::m20260716_090000_events::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    UserId,
    EventId,
    RegistrationNumber,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::UserId).integer().not_null())
                    .col(ColumnDef::new(Registrations::EventId).integer().not_null())
                    .col(
                        ColumnDef::new(Registrations::RegistrationNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registrations-user_id")
                            .from(Registrations::Table, Registrations::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registrations-event_id")
                            .from(Registrations::Table, Registrations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One live registration per (user, event); the ledger leans on
        // this under concurrent callers.
        manager
            .create_index(
                Index::create()
                    .name("idx-registrations-user_id-event_id")
                    .table(Registrations::Table)
                    .col(Registrations::UserId)
                    .col(Registrations::EventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-registrations-event_id")
                    .table(Registrations::Table)
                    .col(Registrations::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await
    }
}
