use std::time::{Duration, Instant};

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use farelink_core::{CoreError, CoreResult};

pub const DEFAULT_CURRENCY: &str = "INR";
pub const MAX_SEARCH_RESULTS: u32 = 20;

/// Seconds shaved off the provider's token TTL so a token is never presented
/// right at its expiry boundary.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 30;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

struct CachedToken {
    access_token: String,
    valid_until: Instant,
}

impl CachedToken {
    fn is_valid(&self, now: Instant) -> bool {
        self.valid_until > now
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// REST client for the flight-data provider. Issues exactly one call per
/// operation and returns the `data` member of the provider envelope
/// unchanged; failures are mapped to the local error taxonomy, never retried.
pub struct ProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
    token: Mutex<Option<CachedToken>>,
}

impl ProviderClient {
    pub fn new(config: ProviderConfig) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CoreError::transport)?;
        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    pub async fn search_locations(
        &self,
        keyword: &str,
        sub_type: Option<&str>,
    ) -> CoreResult<Value> {
        let query = vec![
            ("keyword", keyword.to_string()),
            // Provider default: both airports and cities.
            ("subType", sub_type.unwrap_or("AIRPORT,CITY").to_string()),
        ];
        self.get("/v1/reference-data/locations", &query).await
    }

    pub async fn direct_destinations(&self, origin: &str) -> CoreResult<Value> {
        let query = vec![("departureAirportCode", origin.to_string())];
        self.get("/v1/airport/direct-destinations", &query).await
    }

    pub async fn search_flight_offers(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        adults: u32,
    ) -> CoreResult<Value> {
        let query = offer_search_params(origin, destination, departure_date, adults);
        self.get("/v2/shopping/flight-offers", &query).await
    }

    pub async fn price_offer(&self, offer: &Value) -> CoreResult<Value> {
        let body = json!({
            "data": {
                "type": "flight-offers-pricing",
                "flightOffers": [offer],
            }
        });
        self.post("/v1/shopping/flight-offers/pricing", &body).await
    }

    pub async fn create_order(&self, offer: &Value, travelers: &[Value]) -> CoreResult<Value> {
        let body = json!({
            "data": {
                "type": "flight-order",
                "flightOffers": [offer],
                "travelers": travelers,
            }
        });
        self.post("/v1/booking/flight-orders", &body).await
    }

    pub async fn get_order(&self, order_id: &str) -> CoreResult<Value> {
        self.get(&format!("/v1/booking/flight-orders/{}", order_id), &[])
            .await
    }

    pub async fn cancel_order(&self, order_id: &str) -> CoreResult<()> {
        let token = self.bearer_token().await?;
        let url = format!("{}/v1/booking/flight-orders/{}", self.config.base_url, order_id);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(CoreError::transport)?;
        Self::into_payload(response).await.map(|_| ())
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> CoreResult<Value> {
        let token = self.bearer_token().await?;
        let url = format!("{}{}", self.config.base_url, path);
        debug!("Provider GET {}", path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(CoreError::transport)?;
        Self::into_payload(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> CoreResult<Value> {
        let token = self.bearer_token().await?;
        let url = format!("{}{}", self.config.base_url, path);
        debug!("Provider POST {}", path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(CoreError::transport)?;
        Self::into_payload(response).await
    }

    /// Lazily fetched client-credentials token, cached until shortly before
    /// the provider-reported expiry.
    async fn bearer_token(&self) -> CoreResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.is_valid(Instant::now()) {
                return Ok(cached.access_token.clone());
            }
        }

        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(CoreError::transport)?;

        if !response.status().is_success() {
            warn!("Provider token request rejected: {}", response.status());
            return Err(CoreError::ProviderAuth);
        }

        let token: TokenResponse = response.json().await.map_err(CoreError::transport)?;
        let valid_until = Instant::now()
            + Duration::from_secs(token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS));
        let access_token = token.access_token.clone();
        *guard = Some(CachedToken {
            access_token: token.access_token,
            valid_until,
        });
        Ok(access_token)
    }

    async fn into_payload(response: reqwest::Response) -> CoreResult<Value> {
        let status = response.status();
        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            let payload: Value = response.json().await.map_err(CoreError::transport)?;
            // Provider responses wrap the useful part in a `data` envelope.
            Ok(payload.get("data").cloned().unwrap_or(payload))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(map_status(status.as_u16(), body))
        }
    }
}

pub fn map_status(status: u16, body: String) -> CoreError {
    match status {
        401 => CoreError::ProviderAuth,
        404 => CoreError::not_found("Resource not found at the flight data provider"),
        status => CoreError::Provider { status, body },
    }
}

fn offer_search_params(
    origin: &str,
    destination: &str,
    departure_date: NaiveDate,
    adults: u32,
) -> Vec<(&'static str, String)> {
    vec![
        ("originLocationCode", origin.to_string()),
        ("destinationLocationCode", destination.to_string()),
        ("departureDate", departure_date.format("%Y-%m-%d").to_string()),
        ("adults", adults.to_string()),
        ("currencyCode", DEFAULT_CURRENCY.to_string()),
        ("max", MAX_SEARCH_RESULTS.to_string()),
    ]
}
