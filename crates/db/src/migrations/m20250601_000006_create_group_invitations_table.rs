//! Create group invitations table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupInvitations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GroupInvitations::GroupId).integer().not_null())
                    .col(ColumnDef::new(GroupInvitations::InviterId).integer().not_null())
                    .col(ColumnDef::new(GroupInvitations::InviteeId).integer().not_null())
                    .col(
                        ColumnDef::new(GroupInvitations::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupInvitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GroupInvitations::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_invitations_group_id_groups")
                            .from(GroupInvitations::Table, GroupInvitations::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_invitations_inviter_id_users")
                            .from(GroupInvitations::Table, GroupInvitations::InviterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_invitations_invitee_id_users")
                            .from(GroupInvitations::Table, GroupInvitations::InviteeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one pending invitation per (group, invitee) pair. The
        // database enforces this so concurrent inserts cannot slip past the
        // repository's pending check.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_group_invitations_pending_pair
                ON group_invitations (group_id, invitee_id)
                WHERE status = 'pending';
                ",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_invitations_invitee_id")
                    .table(GroupInvitations::Table)
                    .col(GroupInvitations::InviteeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupInvitations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GroupInvitations {
    Table,
    Id,
    GroupId,
    InviterId,
    InviteeId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
