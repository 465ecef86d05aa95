use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location-access authorization as reported by the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Geographic coordinate pair.
///
/// Produced by one resolution cycle, consumed by the weather client, and
/// discarded after use - never cached across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Query form understood by the weather provider.
    pub fn provider_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Normalized current conditions for one place at one point in time.
///
/// Superseded by the next successful lookup, never merged. `fetched_at` is
/// stamped at normalization time, not taken from the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub region_name: String,
    pub temperature_c: f64,
    pub condition_text: String,
    pub fetched_at: DateTime<Utc>,
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Failed weather lookup.
///
/// Transport failures, rejected credentials, unknown place names and
/// malformed payloads all collapse into this one outcome; the provider does
/// not reliably distinguish them, so neither do we. Sub-causes are logged at
/// the lookup site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("place not found or weather service unavailable")]
pub struct NotFound;
