//! Create event invitations table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventInvitations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventInvitations::EventId).integer().not_null())
                    .col(ColumnDef::new(EventInvitations::InviterId).integer().not_null())
                    .col(ColumnDef::new(EventInvitations::InviteeId).integer().not_null())
                    .col(
                        ColumnDef::new(EventInvitations::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventInvitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(EventInvitations::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_invitations_event_id_events")
                            .from(EventInvitations::Table, EventInvitations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_invitations_inviter_id_users")
                            .from(EventInvitations::Table, EventInvitations::InviterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_invitations_invitee_id_users")
                            .from(EventInvitations::Table, EventInvitations::InviteeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one pending invitation per (event, invitee) pair. The
        // database enforces this so concurrent inserts cannot slip past the
        // repository's pending check.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_event_invitations_pending_pair
                ON event_invitations (event_id, invitee_id)
                WHERE status = 'pending';
                ",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_invitations_invitee_id")
                    .table(EventInvitations::Table)
                    .col(EventInvitations::InviteeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventInvitations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EventInvitations {
    Table,
    Id,
    EventId,
    InviterId,
    InviteeId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
