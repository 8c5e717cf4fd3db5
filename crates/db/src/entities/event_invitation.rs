//! Event invitation entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::invite_status::InviteStatus;

/// Event invitation - tracks who was invited to which event, by whom.
///
/// At most one `Pending` row may exist per (event, invitee) pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_invitations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The event the invitation is for.
    #[sea_orm(indexed)]
    pub event_id: i32,

    /// The user who sent the invitation (the event owner).
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
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
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

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
