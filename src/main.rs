mod booking;
mod config;
mod model;
mod normalizer;
mod payment;
mod pricing;
mod search;
mod server;
mod session;
mod storage;
mod utils;
mod voucher;

use booking::BookingClient;
use config::{AppConfig, load_config};
use reqwest::Client;
use search::{DetailClient, HttpSearchProvider, SearchProvider, SearchService};
use server::AppState;
use session::Session;
use std::sync::Arc;
use std::time::Duration;
use storage::SqliteStorage;
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file
    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Initialize the booking ledger (SQLite) with async access (wrapped in a Mutex)
    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    // One HTTP client shared by every upstream call
    let client = Client::builder()
        .user_agent("TuniStay/0.1")
        .timeout(Duration::from_secs(15))
        .build()
        .expect("❗ Failed to create HTTP client");

    // Inventory backends, tried strictly in this order
    let providers: Vec<Box<dyn SearchProvider>> = vec![
        Box::new(HttpSearchProvider::new(
            client.clone(),
            "primary",
            config.primary_search_url.clone(),
        )),
        Box::new(HttpSearchProvider::new(
            client.clone(),
            "fallback",
            config.fallback_search_url.clone(),
        )),
    ];

    let state = AppState {
        search: Arc::new(SearchService::new(providers)),
        detail: Arc::new(DetailClient::new(
            client.clone(),
            config.hotel_detail_url.clone(),
            config.currency.clone(),
        )),
        booking: Arc::new(BookingClient::new(client, config.booking_url.clone())),
        storage,
        session: Arc::new(Mutex::new(Session::new())),
        config: config.clone(),
    };

    info!("🚀 TuniStay started!");
    server::serve(state, config.listen_port).await;
}
