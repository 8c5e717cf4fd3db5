//! Create rsvps table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rsvps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rsvps::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rsvps::UserId).integer().not_null())
                    .col(ColumnDef::new(Rsvps::EventId).integer().not_null())
                    .col(ColumnDef::new(Rsvps::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Rsvps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Rsvps::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rsvps_user_id_users")
                            .from(Rsvps::Table, Rsvps::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rsvps_event_id_events")
                            .from(Rsvps::Table, Rsvps::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One RSVP row per (user, event); repeat RSVPs update it
        manager
            .create_index(
                Index::create()
                    .name("idx_rsvps_user_event")
                    .table(Rsvps::Table)
                    .col(Rsvps::UserId)
                    .col(Rsvps::EventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rsvps_event_id")
                    .table(Rsvps::Table)
                    .col(Rsvps::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rsvps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rsvps {
    Table,
    Id,
    UserId,
    EventId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}
