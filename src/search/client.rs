use crate::model::{HotelDetail, SearchError, SearchRequest};
use crate::normalizer::{normalize_hotel, normalize_rooms};
use crate::search::traits::SearchProvider;
use reqwest::Client;
use serde_json::Value;

/// One inventory backend reached over HTTP. Primary and fallback are two
/// instances of this with different endpoints.
pub struct HttpSearchProvider {
    client: Client,
    name: String,
    url: String,
}

impl HttpSearchProvider {
    pub fn new(client: Client, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for HttpSearchProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::UpstreamStatus {
                provider: self.name.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Fetches one hotel's detail payload and maps it through the normalizer.
pub struct DetailClient {
    client: Client,
    url: String,
    currency: String,
}

impl DetailClient {
    pub fn new(client: Client, url: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            currency: currency.into(),
        }
    }

    pub async fn fetch(&self, hotel_id: i64) -> Result<HotelDetail, SearchError> {
        let body = serde_json::json!({ "hotelId": hotel_id, "currency": self.currency });
        let response = self.client.post(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::UpstreamStatus {
                provider: "detail".to_string(),
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        // Some backends wrap the detail object, some return it bare.
        let detail = payload.get("hotel").unwrap_or(&payload);

        Ok(HotelDetail {
            hotel: normalize_hotel(detail),
            rooms: normalize_rooms(detail),
        })
    }
}
