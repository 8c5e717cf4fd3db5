//! Gatherly server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use gatherly_api::middleware::AppState;
use gatherly_common::Config;
use gatherly_core::{
    CommentService, EventInvitationService, EventService, GroupInvitationService, GroupService,
    RsvpService, UserService,
};
use gatherly_db::repositories::{
    CommentRepository, EventInvitationRepository, EventRepository, GroupInvitationRepository,
    GroupRepository, RsvpRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatherly=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting gatherly server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = gatherly_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    gatherly_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let event_invitation_repo = EventInvitationRepository::new(Arc::clone(&db));
    let group_invitation_repo = GroupInvitationRepository::new(Arc::clone(&db));
    let rsvp_repo = RsvpRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    // Initialize services
    let state = AppState {
        config: Arc::new(config.clone()),
        user_service: UserService::new(user_repo.clone()),
        event_service: EventService::new(event_repo.clone()),
        group_service: GroupService::new(group_repo.clone()),
        event_invitation_service: EventInvitationService::new(
            event_invitation_repo.clone(),
            event_repo.clone(),
            user_repo.clone(),
        ),
        group_invitation_service: GroupInvitationService::new(
            group_invitation_repo,
            group_repo,
            user_repo,
        ),
        rsvp_service: RsvpService::new(rsvp_repo, event_repo.clone(), event_invitation_repo),
        comment_service: CommentService::new(comment_repo, event_repo),
    };

    let mut app = Router::new()
        .nest("/api", gatherly_api::app(state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Serve the SPA bundle when configured
    if let Some(static_dir) = &config.server.static_dir {
        let index = format!("{static_dir}/index.html");
        app = app.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)));
        info!(static_dir, "Serving static files");
    }

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
