//! Database entities.

pub mod comment;
pub mod event;
pub mod event_invitation;
pub mod group;
pub mod group_invitation;
pub mod group_member;
pub mod invite_status;
pub mod rsvp;
pub mod user;

pub use comment::Entity as Comment;
pub use event::Entity as Event;
pub use event_invitation::Entity as EventInvitation;
pub use group::Entity as Group;
pub use group_invitation::Entity as GroupInvitation;
pub use group_member::Entity as GroupMember;
pub use invite_status::InviteStatus;
pub use rsvp::Entity as Rsvp;
pub use user::Entity as User;
