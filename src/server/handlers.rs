use crate::booking;
use crate::model::{
    BookingError, BookingRecord, CheckoutRequest, HotelDetail, SearchParams, StorageError,
};
use crate::payment;
use crate::pricing::BoardingSelection;
use crate::search::SearchOutcome;
use crate::server::AppState;
use crate::server::error::AppError;
use crate::voucher;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::Html;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

pub async fn search(
    State(state): State<AppState>,
    Json(params): Json<SearchParams>,
) -> Result<Json<SearchOutcome>, AppError> {
    let outcome = state.search.search(&params).await?;
    state.session.lock().await.set_last_search(params);
    Ok(Json(outcome))
}

pub async fn hotel_detail(
    State(state): State<AppState>,
    Path(hotel_id): Path<i64>,
) -> Result<Json<HotelDetail>, AppError> {
    Ok(Json(state.detail.fetch(hotel_id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub reference: String,
    pub redirect_url: String,
    pub nights: i64,
    pub total_amount: f64,
}

/// Full checkout step: re-resolves the selected rooms against the
/// authoritative detail payload, prices the stay server-side, submits
/// upstream and persists the accepted booking.
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    if request.rooms.is_empty() {
        return Err(
            BookingError::Invalid("Veuillez sélectionner au moins une chambre.".into()).into(),
        );
    }

    let detail = state.detail.fetch(request.hotel_id).await?;

    let mut rooms = Vec::with_capacity(request.rooms.len());
    for choice in &request.rooms {
        let room = detail
            .rooms
            .iter()
            .find(|room| room.id == choice.room_id)
            .cloned()
            .ok_or_else(|| {
                BookingError::Invalid("Chambre sélectionnée introuvable.".to_string())
            })?;
        rooms.push(room);
    }

    let mut selection = BoardingSelection::new(rooms.len());
    selection.apply_to_all = request.apply_to_all;
    for (index, choice) in request.rooms.iter().enumerate() {
        if let Some(boarding) = &choice.boarding_type {
            selection.select(index, boarding);
        }
    }

    {
        let mut session = state.session.lock().await;
        session.set_user(request.user_id.clone());
        session.set_last_search(request.search.clone());
    }

    let draft = booking::build_draft(
        detail.hotel,
        rooms,
        &selection,
        request.search,
        request.guest,
        request.user_id,
        state.config.booking_surcharge_rate,
    );
    let redirect_url = state.booking.submit(&draft).await?;

    let record = booking::record_from_draft(&draft);
    state.storage.lock().await.save_booking(&record)?;
    info!(
        "Booking {} stored ({} nights, {:.3} {})",
        record.reference, record.nights, record.total_amount, state.config.currency
    );

    Ok(Json(CheckoutResponse {
        reference: draft.reference,
        redirect_url,
        nights: draft.nights,
        total_amount: draft.total_amount,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: Option<String>,
    pub last_search: Option<SearchParams>,
}

pub async fn session_info(State(state): State<AppState>) -> Json<SessionInfo> {
    let session = state.session.lock().await;
    Json(SessionInfo {
        user_id: session.current_user().map(str::to_string),
        last_search: session.last_search().cloned(),
    })
}

pub async fn payment_page(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Html<String>, AppError> {
    let record = state
        .storage
        .lock()
        .await
        .get_booking(&reference)?
        .ok_or(StorageError::NotFound)?;
    let page = payment::build_redirect_page(
        &state.config.payment,
        record.total_amount,
        &record.reference,
        &state.config.currency,
    )?;
    Ok(Html(page))
}

/// Landing step the gateway redirects back to after a successful payment:
/// the stored booking flips to confirmed and the export links become valid.
pub async fn payment_return(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<BookingRecord>, AppError> {
    let storage = state.storage.lock().await;
    storage.set_status(&reference, "confirmed")?;
    let record = storage
        .get_booking(&reference)?
        .ok_or(StorageError::NotFound)?;
    info!("Booking {} confirmed after payment return", record.reference);
    Ok(Json(record))
}

pub async fn voucher_page(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Html<String>, AppError> {
    let record = state
        .storage
        .lock()
        .await
        .get_booking(&reference)?
        .ok_or(StorageError::NotFound)?;
    Ok(Html(voucher::voucher_html(&record, &state.config.currency)))
}

pub async fn wallet_pass(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .storage
        .lock()
        .await
        .get_booking(&reference)?
        .ok_or(StorageError::NotFound)?;
    Ok(Json(voucher::wallet_pass(&record, &state.config.currency)))
}

pub async fn admin_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    Ok(Json(state.storage.lock().await.list_bookings()?))
}
