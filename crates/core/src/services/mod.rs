//! Business logic services.

pub mod comment;
pub mod event;
pub mod event_invitation;
pub mod group;
pub mod group_invitation;
pub mod rsvp;
pub mod user;

pub use comment::{CommentResponse, CommentService, CreateCommentInput};
pub use event::{CreateEventInput, EventResponse, EventService, UpdateEventInput};
pub use event_invitation::{EventInvitationResponse, EventInvitationService, InviteToEventInput};
pub use group::{CreateGroupInput, GroupResponse, GroupService, UpdateGroupInput};
pub use group_invitation::{GroupInvitationResponse, GroupInvitationService, InviteToGroupInput};
pub use rsvp::{RsvpInput, RsvpResponse, RsvpService};
pub use user::{LoginInput, RegisterInput, UserResponse, UserService};
