pub mod error;
pub mod handlers;

use crate::booking::BookingClient;
use crate::config::AppConfig;
use crate::search::{DetailClient, SearchService};
use crate::session::Session;
use crate::storage::SqliteStorage;
use axum::Router;
use axum::http::{Method, header::CONTENT_TYPE};
use axum::routing::{get, post};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub search: Arc<SearchService>,
    pub detail: Arc<DetailClient>,
    pub booking: Arc<BookingClient>,
    pub storage: Arc<Mutex<SqliteStorage>>,
    pub session: Arc<Mutex<Session>>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/search", post(handlers::search))
        .route("/api/hotels/:id", get(handlers::hotel_detail))
        .route("/api/bookings", post(handlers::checkout))
        .route("/api/session", get(handlers::session_info))
        .route("/api/bookings/:reference/payment", get(handlers::payment_page))
        .route(
            "/api/bookings/:reference/payment/return",
            get(handlers::payment_return),
        )
        .route("/api/bookings/:reference/voucher", get(handlers::voucher_page))
        .route("/api/bookings/:reference/pass", get(handlers::wallet_pass))
        .route("/api/admin/bookings", get(handlers::admin_bookings))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) {
    let app = router(state);
    let address = format!("0.0.0.0:{}", port);

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind listen address");
    info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shut down.");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
