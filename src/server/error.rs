use crate::model::{BookingError, PaymentError, SearchError, StorageError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Domain failures mapped onto HTTP responses. Messages are what the web
/// client shows inline; the technical cause only goes to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Search(SearchError::Invalid(message))
            | AppError::Booking(BookingError::Invalid(message)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
            }
            AppError::Search(_) => {
                warn!("Search failed: {:?}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "Le service de recherche est momentanément indisponible. Veuillez réessayer plus tard."
                        .to_string(),
                )
            }
            AppError::Booking(BookingError::MissingRedirectUrl) => {
                warn!("Booking accepted without a payment redirect url");
                (
                    StatusCode::BAD_GATEWAY,
                    "Le paiement n'a pas pu être initié. Veuillez réessayer.".to_string(),
                )
            }
            AppError::Booking(_) => {
                warn!("Booking failed: {:?}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "La réservation a échoué. Veuillez réessayer.".to_string(),
                )
            }
            AppError::Payment(PaymentError::InvalidAmount(amount)) => {
                warn!("Refused payment redirect for amount {}", amount);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Montant de paiement invalide.".to_string(),
                )
            }
            AppError::Payment(PaymentError::MissingCredentials) => {
                error!("Payment gateway credentials are not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Le paiement est indisponible pour le moment.".to_string(),
                )
            }
            AppError::Storage(StorageError::NotFound) => {
                (StatusCode::NOT_FOUND, "Réservation introuvable.".to_string())
            }
            AppError::Storage(_) => {
                error!("Storage failure: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erreur interne. Veuillez réessayer.".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
