//! Group invitation entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::invite_status::InviteStatus;

/// Group invitation - tracks who was invited to which group, by whom.
///
/// At most one `Pending` row may exist per (group, invitee) pair, and an
/// invitation is never created for an existing member.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_invitations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The group the invitation is for.
    #[sea_orm(indexed)]
    pub group_id: i32,

    /// The user who sent the invitation (the group owner).
    #[sea_orm(indexed)]
    pub inviter_id: i32,

    /// The user being invited.
    #[sea_orm(indexed)]
    pub invitee_id: i32,

    /// Current status of the invitation.
    pub status: InviteStatus,

    pub created_at: DateTimeWithTimeZone,

    /// When the status was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InviterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Inviter,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InviteeId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Invitee,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
