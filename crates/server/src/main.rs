//! Shutter server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use shutter_api::{AppState, auth_middleware, router as api_router};
use shutter_common::{Config, LocalStorage, StorageBackend};
use shutter_core::{
    AccountService, BadgeService, DetectionService, FollowService, ImageService,
    LeaderboardService, ProfileService, RatingService, ReportService, StreakService,
};
use shutter_db::repositories::{
    AdminNotificationRepository, FollowRepository, ImageRepository, ProfileRepository,
    RatingRepository, ReportRepository, StreakRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the global top-3 badges are refreshed.
const BADGE_RECOMPUTE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Multipart framing headroom on top of the raw upload limit.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

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
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shutter=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting shutter server...");

    // Load configuration
    let _ = dotenvy::dotenv();
    let config = Config::load()?;

    // Connect to database
    let db = shutter_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    shutter_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let image_repo = ImageRepository::new(Arc::clone(&db));
    let rating_repo = RatingRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let streak_repo = StreakRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let notification_repo = AdminNotificationRepository::new(Arc::clone(&db));

    // Initialize photo storage
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        config.storage.base_path.clone().into(),
        config.storage.base_url.clone(),
    ));

    // Initialize services
    let detection_service = DetectionService::new(&config.detection)?;
    let account_service = AccountService::new(user_repo.clone(), profile_repo.clone());
    let profile_service = ProfileService::new(profile_repo.clone(), follow_repo.clone());
    let image_service = ImageService::new(
        image_repo.clone(),
        profile_repo.clone(),
        storage,
        detection_service,
        config.storage.max_upload_bytes,
    );
    let rating_service = RatingService::new(
        rating_repo.clone(),
        image_repo.clone(),
        profile_repo.clone(),
    );
    let streak_service = StreakService::new(streak_repo, &config.streak);
    let leaderboard_service =
        LeaderboardService::new(image_repo.clone(), profile_repo.clone(), streak_service);
    let follow_service = FollowService::new(follow_repo, user_repo, profile_repo.clone());
    let report_service = ReportService::new(report_repo, image_repo, notification_repo);
    let badge_service = BadgeService::new(profile_repo);

    // Create app state
    let state = AppState {
        account_service,
        profile_service,
        image_service,
        rating_service,
        leaderboard_service,
        follow_service,
        report_service,
        badge_service,
    };

    // Refresh the global badges in the background
    let badge_task = state.badge_service.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(BADGE_RECOMPUTE_INTERVAL);
        loop {
            ticker.tick().await;
            match badge_task.recompute().await {
                Ok(badged) => info!(count = badged.len(), "Refreshed global badges"),
                Err(e) => tracing::error!(error = %e, "Badge refresh failed"),
            }
        }
    });

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(
            config.storage.base_url.as_str(),
            ServeDir::new(&config.storage.base_path),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(
            config
                .storage
                .max_upload_bytes
                .saturating_add(BODY_LIMIT_HEADROOM),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
