use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streetlight_api::config::{LogFormat, ServerConfig};
use streetlight_api::router::build_app_router;
use streetlight_api::state::AppState;
use streetlight_push::{FcmConfig, FcmDelivery, LogDelivery, NotificationDispatcher, PushTransport};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "streetlight_api=debug,streetlight_push=debug,tower_http=debug".into()
        }),
    );
    match LogFormat::from_env() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Push transport ---
    let transport: Arc<dyn PushTransport> = match FcmConfig::from_env() {
        Some(fcm_config) => {
            let delivery = FcmDelivery::new(fcm_config).expect("Failed to initialise FCM delivery");
            tracing::info!(project_id = %delivery.project_id(), "FCM delivery configured");
            Arc::new(delivery)
        }
        None => {
            tracing::warn!(
                "No FCM credentials (FCM_ACCESS_TOKEN / GOOGLE_APPLICATION_CREDENTIALS), \
                 push messages will only be logged"
            );
            Arc::new(LogDelivery::new())
        }
    };

    // --- App state ---
    let state = AppState {
        dispatcher: NotificationDispatcher::new(transport),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = drain_tx.send(());
            })
            .await
    });

    // After the signal, in-flight triggers get a bounded window to finish their send.
    let _ = drain_rx.await;
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(Ok(result)) => result.expect("Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed"),
        Err(_) => tracing::warn!("Shutdown timed out with triggers still in flight"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by the platform.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
