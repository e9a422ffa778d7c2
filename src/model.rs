// Core structs: canonical hotel/room records, search input, booking drafts
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical hotel record produced by the normalizer. `price` is the minimum
/// over all numerically priced rooms; when no room carries a price,
/// `has_price` is false and `price` stays 0.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: String,
    pub stars: u8,
    pub rating: f64,
    pub review_count: u32,
    pub description: String,
    pub image: String,
    pub images: Vec<String>,
    pub price: f64,
    pub has_price: bool,
    pub on_request_only: bool,
    pub amenities: Vec<String>,
    pub boarding_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingOption {
    pub boarding_type: String,
    pub price_per_night: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub beds: String,
    pub max_occupancy: u32,
    pub size: String,
    /// Default nightly rate, used when no boarding selection matches.
    pub price_per_night: f64,
    pub default_boarding: String,
    pub boarding_options: Vec<BoardingOption>,
    pub amenities: Vec<String>,
    pub cancellation_policy: String,
    pub cancellation_deadline: Option<NaiveDate>,
    pub on_request: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetail {
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    ByCity,
    ByName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub adults: u32,
    #[serde(default)]
    pub children_ages: Vec<u32>,
}

/// Search input as submitted by the client. `city_id` and `hotel_name` are
/// mutually exclusive depending on `mode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub mode: SearchMode,
    #[serde(default)]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub rooms: Vec<RoomOccupancy>,
}

/// Wire request sent to the inventory backends (primary and fallback share
/// one shape).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub city_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    pub check_in: String,
    pub check_out: String,
    pub rooms: Vec<SearchRequestRoom>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestRoom {
    pub adults: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children_ages: Vec<u32>,
}

impl SearchRequest {
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            city_id: params.city_id.unwrap_or(0),
            hotel_name: params.hotel_name.clone().filter(|n| !n.trim().is_empty()),
            check_in: params
                .check_in
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            check_out: params
                .check_out
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            rooms: params
                .rooms
                .iter()
                .map(|r| SearchRequestRoom {
                    adults: r.adults,
                    children_ages: r.children_ages.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl GuestDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// One selected room inside a booking, with the boarding choice already
/// resolved to a concrete nightly rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRoom {
    pub room: Room,
    pub boarding_type: String,
    pub price_per_night: f64,
}

/// Transient checkout state. Exists only between room selection and the
/// submission boundary; what survives is a `BookingRecord`.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub reference: String,
    pub hotel: Hotel,
    pub rooms: Vec<BookedRoom>,
    pub params: SearchParams,
    pub guest: GuestDetails,
    pub user_id: Option<String>,
    pub nights: i64,
    pub total_amount: f64,
}

/// Locally persisted booking, backing the admin list and the voucher/pass
/// export endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub reference: String,
    pub hotel_id: i64,
    pub hotel_name: String,
    pub city: String,
    pub guest_name: String,
    pub guest_email: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub rooms_summary: String,
    pub nights: i64,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Client checkout request: room choices refer to rooms of the hotel's
/// detail payload by id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub hotel_id: i64,
    pub search: SearchParams,
    pub guest: GuestDetails,
    #[serde(default)]
    pub user_id: Option<String>,
    pub rooms: Vec<RoomChoice>,
    #[serde(default)]
    pub apply_to_all: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomChoice {
    pub room_id: i64,
    #[serde(default)]
    pub boarding_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Invalid(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider {provider} answered with status {status}")]
    UpstreamStatus { provider: String, status: u16 },
    #[error("all search providers failed")]
    Exhausted,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Invalid(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("booking submission timed out")]
    Timeout,
    #[error("booking rejected upstream [{status}]: {body}")]
    Rejected { status: u16, body: String },
    #[error("booking response carries no payment redirect url")]
    MissingRedirectUrl,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway credentials are not configured")]
    MissingCredentials,
    #[error("invalid payment amount: {0}")]
    InvalidAmount(f64),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("booking not found")]
    NotFound,
}
