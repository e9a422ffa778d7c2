// Search flow: validate input, run the provider chain, normalize the first
// usable payload.

pub mod client;
pub mod traits;

pub use client::{DetailClient, HttpSearchProvider};
pub use traits::SearchProvider;

use crate::model::{Hotel, SearchError, SearchMode, SearchParams, SearchRequest};
use crate::normalizer::normalize_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub hotels: Vec<Hotel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_count: Option<u64>,
}

/// Ordered provider attempts. Strictly sequential: the next provider is
/// tried only after the previous one failed or answered with an unusable
/// shape, never in parallel.
pub struct SearchService {
    providers: Vec<Box<dyn SearchProvider>>,
}

impl SearchService {
    pub fn new(providers: Vec<Box<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// Uniform usable-response predicate shared by every provider attempt:
    /// the payload must carry a `hotels` array.
    pub fn is_usable(payload: &Value) -> bool {
        payload.get("hotels").map(Value::is_array).unwrap_or(false)
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchOutcome, SearchError> {
        validate_params(params)?;
        let request = SearchRequest::from_params(params);

        for provider in &self.providers {
            match provider.search(&request).await {
                Ok(payload) if Self::is_usable(&payload) => {
                    let raw_hotels = payload
                        .get("hotels")
                        .and_then(Value::as_array)
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);
                    let hotels = normalize_all(raw_hotels);
                    info!(
                        "Provider {} returned {} hotels",
                        provider.name(),
                        hotels.len()
                    );
                    return Ok(SearchOutcome {
                        hotels,
                        raw_count: payload.get("rawCount").and_then(Value::as_u64),
                        visible_count: payload.get("visibleCount").and_then(Value::as_u64),
                    });
                }
                Ok(_) => {
                    warn!("Provider {} answered with an unusable shape", provider.name());
                }
                Err(e) => {
                    warn!("Provider {} failed: {:?}", provider.name(), e);
                }
            }
        }

        Err(SearchError::Exhausted)
    }
}

fn validate_params(params: &SearchParams) -> Result<(), SearchError> {
    let has_name = params
        .hotel_name
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty());

    match params.mode {
        SearchMode::ByCity => {
            if params.city_id.is_none() {
                return Err(SearchError::Invalid("Veuillez choisir une ville.".into()));
            }
            if has_name {
                return Err(SearchError::Invalid(
                    "Recherche par ville et par nom d'hôtel à la fois impossible.".into(),
                ));
            }
        }
        SearchMode::ByName => {
            if !has_name {
                return Err(SearchError::Invalid(
                    "Veuillez saisir le nom de l'hôtel.".into(),
                ));
            }
            if params.city_id.is_some() {
                return Err(SearchError::Invalid(
                    "Recherche par ville et par nom d'hôtel à la fois impossible.".into(),
                ));
            }
        }
    }

    let (check_in, check_out) = match (params.check_in, params.check_out) {
        (Some(check_in), Some(check_out)) => (check_in, check_out),
        _ => {
            return Err(SearchError::Invalid(
                "Veuillez renseigner les dates de séjour.".into(),
            ));
        }
    };
    if check_out <= check_in {
        return Err(SearchError::Invalid(
            "La date de départ doit être après la date d'arrivée.".into(),
        ));
    }

    if params.rooms.is_empty() || params.rooms.iter().any(|r| r.adults == 0) {
        return Err(SearchError::Invalid(
            "Au moins un adulte par chambre est requis.".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoomOccupancy;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        name: &'static str,
        response: Option<Value>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl SearchProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Value, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(payload) => Ok(payload.clone()),
                None => Err(SearchError::UpstreamStatus {
                    provider: self.name.to_string(),
                    status: 500,
                }),
            }
        }
    }

    fn valid_params() -> SearchParams {
        SearchParams {
            mode: SearchMode::ByCity,
            city_id: Some(12),
            hotel_name: None,
            check_in: NaiveDate::from_ymd_opt(2026, 8, 10),
            check_out: NaiveDate::from_ymd_opt(2026, 8, 14),
            rooms: vec![RoomOccupancy {
                adults: 2,
                children_ages: vec![6],
            }],
        }
    }

    fn service_with(
        primary: Option<Value>,
        fallback: Option<Value>,
    ) -> (SearchService, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let service = SearchService::new(vec![
            Box::new(FakeProvider {
                name: "primary",
                response: primary,
                calls: primary_calls.clone(),
            }),
            Box::new(FakeProvider {
                name: "fallback",
                response: fallback,
                calls: fallback_calls.clone(),
            }),
        ]);
        (service, primary_calls, fallback_calls)
    }

    #[test]
    fn usable_means_hotels_is_an_array() {
        assert!(SearchService::is_usable(&json!({ "hotels": [] })));
        assert!(!SearchService::is_usable(&json!({ "hotels": "none" })));
        assert!(!SearchService::is_usable(&json!({ "success": true })));
    }

    #[tokio::test]
    async fn usable_primary_skips_the_fallback() {
        let (service, primary_calls, fallback_calls) = service_with(
            Some(json!({ "hotels": [{ "id": 1, "name": "Hôtel Carthage" }], "rawCount": 1 })),
            Some(json!({ "hotels": [] })),
        );
        let outcome = service.search(&valid_params()).await.unwrap();
        assert_eq!(outcome.hotels.len(), 1);
        assert_eq!(outcome.raw_count, Some(1));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_hotels_array_triggers_exactly_one_fallback() {
        let (service, primary_calls, fallback_calls) = service_with(
            Some(json!({ "success": false })),
            Some(json!({ "hotels": [{ "id": 9 }] })),
        );
        let outcome = service.search(&valid_params()).await.unwrap();
        assert_eq!(outcome.hotels.len(), 1);
        assert_eq!(outcome.hotels[0].name, "9");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn primary_error_falls_through_to_fallback() {
        let (service, primary_calls, fallback_calls) =
            service_with(None, Some(json!({ "hotels": [] })));
        let outcome = service.search(&valid_params()).await.unwrap();
        assert!(outcome.hotels.is_empty());
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_after_both_providers_fail() {
        let (service, primary_calls, fallback_calls) = service_with(None, None);
        let err = service.search(&valid_params()).await.unwrap_err();
        assert!(matches!(err, SearchError::Exhausted));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn validation_rejects_before_any_provider_call() {
        let (service, primary_calls, fallback_calls) =
            service_with(Some(json!({ "hotels": [] })), Some(json!({ "hotels": [] })));

        let mut missing_city = valid_params();
        missing_city.city_id = None;
        assert!(matches!(
            service.search(&missing_city).await.unwrap_err(),
            SearchError::Invalid(_)
        ));

        let mut bad_dates = valid_params();
        bad_dates.check_out = bad_dates.check_in;
        assert!(matches!(
            service.search(&bad_dates).await.unwrap_err(),
            SearchError::Invalid(_)
        ));

        let mut both_targets = valid_params();
        both_targets.hotel_name = Some("Dar El Medina".to_string());
        assert!(matches!(
            service.search(&both_targets).await.unwrap_err(),
            SearchError::Invalid(_)
        ));

        let mut no_adults = valid_params();
        no_adults.rooms = vec![RoomOccupancy {
            adults: 0,
            children_ages: vec![],
        }];
        assert!(matches!(
            service.search(&no_adults).await.unwrap_err(),
            SearchError::Invalid(_)
        ));

        assert_eq!(primary_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn by_name_search_requires_a_name() {
        let (service, _, _) = service_with(Some(json!({ "hotels": [] })), None);
        let mut params = valid_params();
        params.mode = SearchMode::ByName;
        params.city_id = None;
        params.hotel_name = Some("  ".to_string());
        assert!(matches!(
            service.search(&params).await.unwrap_err(),
            SearchError::Invalid(_)
        ));

        params.hotel_name = Some("Hôtel Carthage".to_string());
        assert!(service.search(&params).await.is_ok());
    }
}
