use serde::Deserialize;
use std::fs;

/// Surcharge applied on top of every nightly rate. The upstream platform
/// applies it uniformly regardless of currency or jurisdiction; its exact
/// meaning is undocumented, so it stays a configurable rate.
pub const DEFAULT_SURCHARGE_RATE: f64 = 0.10;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub gateway_url: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub listen_port: u16,
    pub primary_search_url: String,
    pub fallback_search_url: String,
    pub hotel_detail_url: String,
    pub booking_url: String,
    pub payment: PaymentConfig,
    #[serde(default = "default_surcharge_rate")]
    pub booking_surcharge_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_surcharge_rate() -> f64 {
    DEFAULT_SURCHARGE_RATE
}

fn default_currency() -> String {
    "TND".to_string()
}

fn default_db_path() -> String {
    "data.db".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
