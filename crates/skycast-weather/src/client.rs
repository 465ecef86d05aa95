//! Weather provider client.
//!
//! Two lookup entry points share one fetch-and-normalize path; every failure
//! mode collapses into the single `NotFound` outcome. Each call is a fresh
//! network round trip - no retry, no caching, no rate limiting.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::types::{Coordinates, NotFound, WeatherSnapshot};

// Strict payload shape: a response missing any of these fields is malformed
// and folds into the same outcome as an unknown place.
#[derive(Debug, Deserialize)]
struct CurrentPayload {
    location: PlacePayload,
    current: ConditionsPayload,
}

#[derive(Debug, Deserialize)]
struct PlacePayload {
    region: String,
}

#[derive(Debug, Deserialize)]
struct ConditionsPayload {
    temp_c: f64,
    condition: ConditionPayload,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    text: String,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl WeatherClient {
    /// Build a client for the given endpoint and credential.
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Current conditions at a coordinate pair.
    pub async fn lookup_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, NotFound> {
        self.fetch_current(&coordinates.provider_query()).await
    }

    /// Current conditions for a free-text place name.
    pub async fn lookup_by_name(&self, place: &str) -> Result<WeatherSnapshot, NotFound> {
        self.fetch_current(place).await
    }

    async fn fetch_current(&self, query: &str) -> Result<WeatherSnapshot, NotFound> {
        let url = format!("{}/current.json", self.endpoint);

        let response = match self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Weather request failed: {}", e);
                return Err(NotFound);
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Weather lookup returned status {}", response.status());
            return Err(NotFound);
        }

        let payload: CurrentPayload = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("Weather payload parse error: {}", e);
                return Err(NotFound);
            }
        };

        let snapshot = WeatherSnapshot {
            region_name: payload.location.region,
            temperature_c: payload.current.temp_c,
            condition_text: payload.current.condition.text,
            fetched_at: Utc::now(),
        };

        tracing::info!(
            "Current conditions for {}: {:.1}°C, {}",
            snapshot.region_name,
            snapshot.temperature_c,
            snapshot.condition_text
        );

        Ok(snapshot)
    }
}
