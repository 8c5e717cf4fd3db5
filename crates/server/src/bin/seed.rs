//! Populate the database with sample data for local development.
//!
//! Runs through the real services so every row satisfies the same rules the
//! API enforces: invitations precede memberships and RSVPs, owners own what
//! they mutate.

use std::sync::Arc;

use gatherly_common::Config;
use gatherly_core::{
    CommentService, CreateCommentInput, CreateEventInput, CreateGroupInput, EventInvitationService,
    EventService, GroupInvitationService, GroupService, InviteToEventInput, InviteToGroupInput,
    RegisterInput, RsvpInput, RsvpService, UserService,
};
use gatherly_db::repositories::{
    CommentRepository, EventInvitationRepository, EventRepository, GroupInvitationRepository,
    GroupRepository, RsvpRepository, UserRepository,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_USERS: &[(&str, &str)] = &[
    ("alice", "alice@example.com"),
    ("bob", "bob@example.com"),
    ("carol", "carol@example.com"),
    ("dave", "dave@example.com"),
];

const SAMPLE_PASSWORD: &str = "Passw0rd!";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatherly=info".into()),
        )
        .init();

    let config = Config::load()?;
    let db = gatherly_db::init(&config).await?;
    gatherly_db::migrate(&db).await?;

    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let event_invitation_repo = EventInvitationRepository::new(Arc::clone(&db));
    let group_invitation_repo = GroupInvitationRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone());
    let event_service = EventService::new(event_repo.clone());
    let group_service = GroupService::new(group_repo.clone());
    let event_invitation_service = EventInvitationService::new(
        event_invitation_repo.clone(),
        event_repo.clone(),
        user_repo.clone(),
    );
    let group_invitation_service =
        GroupInvitationService::new(group_invitation_repo, group_repo, user_repo);
    let rsvp_service = RsvpService::new(
        RsvpRepository::new(Arc::clone(&db)),
        event_repo.clone(),
        event_invitation_repo,
    );
    let comment_service = CommentService::new(CommentRepository::new(Arc::clone(&db)), event_repo);

    // Users
    let mut users = Vec::new();
    for (username, email) in SAMPLE_USERS {
        let user = user_service
            .register(RegisterInput {
                username: (*username).to_string(),
                email: (*email).to_string(),
                password: SAMPLE_PASSWORD.to_string(),
            })
            .await?;
        info!(username, id = user.id, "Seeded user");
        users.push(user);
    }

    let alice = &users[0];
    let bob = &users[1];
    let carol = &users[2];
    let dave = &users[3];

    // Events
    let launch = event_service
        .create(
            alice.id,
            CreateEventInput {
                name: "Product Launch".to_string(),
                date: "2026-09-14T18:30".to_string(),
                location: "Town Hall".to_string(),
                description: "Launch party for the autumn release.".to_string(),
            },
        )
        .await?;

    let picnic = event_service
        .create(
            bob.id,
            CreateEventInput {
                name: "Summer Picnic".to_string(),
                date: "2026-07-04T12:00".to_string(),
                location: "Riverside Park".to_string(),
                description: "Bring a dish to share.".to_string(),
            },
        )
        .await?;
    info!(launch = launch.id, picnic = picnic.id, "Seeded events");

    // Groups (creator is auto-enrolled)
    let hiking = group_service
        .create(
            alice.id,
            CreateGroupInput {
                name: "Hiking Club".to_string(),
                description: "Weekend trails and day hikes.".to_string(),
            },
        )
        .await?;

    let book_club = group_service
        .create(
            carol.id,
            CreateGroupInput {
                name: "Book Club".to_string(),
                description: "One novel a month.".to_string(),
            },
        )
        .await?;
    info!(hiking = hiking.id, book_club = book_club.id, "Seeded groups");

    // Event invitations: bob and carol are invited to the launch; bob accepts
    // and RSVPs, carol leaves hers pending.
    let bob_invite = event_invitation_service
        .invite(
            alice.id,
            InviteToEventInput {
                event_id: launch.id,
                invitee_id: bob.id,
            },
        )
        .await?;
    event_invitation_service
        .accept(bob_invite.id, bob.id)
        .await?;
    rsvp_service
        .rsvp(
            bob.id,
            RsvpInput {
                event_id: launch.id,
                status: "Confirmed".to_string(),
            },
        )
        .await?;

    event_invitation_service
        .invite(
            alice.id,
            InviteToEventInput {
                event_id: launch.id,
                invitee_id: carol.id,
            },
        )
        .await?;

    // Group invitations: bob joins the hiking club, dave denies the book club.
    let hiking_invite = group_invitation_service
        .invite(
            alice.id,
            InviteToGroupInput {
                group_id: hiking.id,
                invitee_id: bob.id,
            },
        )
        .await?;
    group_invitation_service
        .accept(hiking_invite.id, bob.id)
        .await?;

    let book_invite = group_invitation_service
        .invite(
            carol.id,
            InviteToGroupInput {
                group_id: book_club.id,
                invitee_id: dave.id,
            },
        )
        .await?;
    group_invitation_service
        .deny(book_invite.id, dave.id)
        .await?;

    // Comments
    comment_service
        .add(
            launch.id,
            bob.id,
            CreateCommentInput {
                content: "Looking forward to it!".to_string(),
            },
        )
        .await?;
    comment_service
        .add(
            picnic.id,
            bob.id,
            CreateCommentInput {
                content: "I'll bring lemonade.".to_string(),
            },
        )
        .await?;

    info!("Seed data created");
    Ok(())
}
