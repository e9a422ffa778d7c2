// Checkout: booking draft assembly and submission to the booking backend.
use crate::model::{
    BookedRoom, BookingDraft, BookingError, BookingRecord, GuestDetails, Hotel, Room, SearchParams,
};
use crate::pricing::{self, BoardingSelection};
use chrono::Utc;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

const REDIRECT_URL_KEYS: &[&str] = &["paymentUrl", "payment_url"];

/// Booking references double as payment order ids.
pub fn new_reference() -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!("TS-{}-{:06}", Utc::now().timestamp(), suffix)
}

/// Assembles the transient checkout draft: resolves each room's boarding
/// choice to a concrete rate and computes the authoritative totals.
pub fn build_draft(
    hotel: Hotel,
    rooms: Vec<Room>,
    selection: &BoardingSelection,
    params: SearchParams,
    guest: GuestDetails,
    user_id: Option<String>,
    surcharge_rate: f64,
) -> BookingDraft {
    let nights = pricing::nights_between(params.check_in, params.check_out);
    let total_amount = pricing::total_for_booking(&rooms, selection, nights, surcharge_rate);

    let rooms = rooms
        .into_iter()
        .enumerate()
        .map(|(index, room)| {
            let price_per_night = pricing::price_for_room(&room, selection, index);
            let boarding_type = selection
                .selected_for(index)
                .filter(|chosen| {
                    room.boarding_options
                        .iter()
                        .any(|option| option.boarding_type == *chosen)
                })
                .unwrap_or(room.default_boarding.as_str())
                .to_string();
            BookedRoom {
                room,
                boarding_type,
                price_per_night,
            }
        })
        .collect();

    BookingDraft {
        reference: new_reference(),
        hotel,
        rooms,
        params,
        guest,
        user_id,
        nights,
        total_amount,
    }
}

/// What survives the checkout: the locally persisted booking behind the
/// admin list and the voucher/pass exports.
pub fn record_from_draft(draft: &BookingDraft) -> BookingRecord {
    let rooms_summary = draft
        .rooms
        .iter()
        .map(|booked| {
            if booked.boarding_type.is_empty() {
                booked.room.name.clone()
            } else {
                format!("{} ({})", booked.room.name, booked.boarding_type)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    BookingRecord {
        reference: draft.reference.clone(),
        hotel_id: draft.hotel.id,
        hotel_name: draft.hotel.name.clone(),
        city: draft.hotel.city.clone(),
        guest_name: draft.guest.full_name(),
        guest_email: draft.guest.email.clone(),
        check_in: draft.params.check_in,
        check_out: draft.params.check_out,
        rooms_summary,
        nights: draft.nights,
        total_amount: draft.total_amount,
        status: "pending".to_string(),
        created_at: Utc::now(),
    }
}

/// The redirect URL is accepted under either of the two spellings the
/// booking backend has been seen to use.
pub fn extract_redirect_url(payload: &Value) -> Option<String> {
    REDIRECT_URL_KEYS
        .iter()
        .filter_map(|key| payload.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

pub struct BookingClient {
    client: Client,
    url: String,
}

impl BookingClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Submits the draft and returns the payment redirect URL. A response
    /// without a usable URL is a hard failure.
    pub async fn submit(&self, draft: &BookingDraft) -> Result<String, BookingError> {
        let payload = submission_payload(draft);
        info!(
            "Submitting booking {} ({} rooms, {:.3} total)",
            draft.reference,
            draft.rooms.len(),
            draft.total_amount
        );

        let response = match timeout(
            Duration::from_secs(15),
            self.client.post(&self.url).json(&payload).send(),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Booking submission failed: {:?}", e);
                return Err(BookingError::Http(e));
            }
            Err(_) => {
                warn!("Booking submission timed out");
                return Err(BookingError::Timeout);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("Booking backend responded [{}]: {}", status, body);
            return Err(BookingError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        extract_redirect_url(&body).ok_or(BookingError::MissingRedirectUrl)
    }
}

fn submission_payload(draft: &BookingDraft) -> Value {
    serde_json::json!({
        "reference": draft.reference,
        "hotelId": draft.hotel.id,
        "hotel": draft.hotel,
        "rooms": draft.rooms,
        "search": draft.params,
        "guest": draft.guest,
        "userId": draft.user_id,
        "nights": draft.nights,
        "totalAmount": draft.total_amount,
    })
}
