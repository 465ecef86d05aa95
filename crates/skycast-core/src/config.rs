use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Location resolution settings
    #[serde(default)]
    pub location: LocationConfig,
}

/// Weather provider endpoint and credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the current-conditions endpoint
    pub endpoint: String,

    /// API credential, static for the lifetime of the process.
    /// Can be overridden with the SKYCAST_WEATHER_API_KEY environment variable.
    pub api_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl WeatherConfig {
    /// Check if the credential is configured (not a placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.weatherapi.com/v1".to_string(),
            api_key: "YOUR_WEATHER_API_KEY".to_string(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Location resolution settings.
///
/// `timeout_ms` and `max_age_ms` mirror the one-shot position request options
/// of the platform geolocation API. Pinning `latitude`/`longitude` selects a
/// fixed location source instead of the platform backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Trade latency for GPS precision
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,

    /// Abandon the fix request after this many milliseconds
    #[serde(default = "default_fix_timeout_ms")]
    pub timeout_ms: u64,

    /// Accept a cached fix no older than this before forcing a fresh read
    #[serde(default = "default_fix_max_age_ms")]
    pub max_age_ms: u64,

    /// Pinned latitude (requires `longitude`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Pinned longitude (requires `latitude`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn default_high_accuracy() -> bool {
    true
}

fn default_fix_timeout_ms() -> u64 {
    15_000
}

fn default_fix_max_age_ms() -> u64 {
    10_000
}

impl LocationConfig {
    /// Pinned coordinates, if both halves are present.
    pub fn pinned_coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: default_high_accuracy(),
            timeout_ms: default_fix_timeout_ms(),
            max_age_ms: default_fix_max_age_ms(),
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    ///
    /// The SKYCAST_WEATHER_API_KEY environment variable overrides the stored
    /// credential.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;

            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        if let Ok(key) = std::env::var("SKYCAST_WEATHER_API_KEY") {
            config.weather.api_key = key;
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Validate the provider endpoint
        self.validate_url(&self.weather.endpoint, "weather.endpoint", &mut result);

        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                "API credential not configured - lookups will be rejected by the provider",
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Request timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning(
                "weather.timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.location.timeout_ms == 0 {
            result.add_error(
                "location.timeout_ms",
                "Fix timeout of 0 would fail every resolution attempt",
            );
        }

        if self.location.max_age_ms > 3_600_000 {
            result.add_warning(
                "location.max_age_ms",
                "Accepting cached fixes older than an hour",
            );
        }

        // Pinned coordinates must come as a pair and be on the globe
        match (self.location.latitude, self.location.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                result.add_error(
                    "location",
                    "latitude and longitude must be set together",
                );
            }
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (None, None) => {}
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
    }

    #[test]
    fn test_placeholder_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = Config::default();
        config.weather.endpoint = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.endpoint"));
    }

    #[test]
    fn test_invalid_endpoint_scheme() {
        let mut config = Config::default();
        config.weather.endpoint = "ftp://api.weatherapi.com/v1".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_request_timeout_is_error() {
        let mut config = Config::default();
        config.weather.timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.timeout_secs"));
    }

    #[test]
    fn test_zero_fix_timeout_is_error() {
        let mut config = Config::default();
        config.location.timeout_ms = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location.timeout_ms"));
    }

    #[test]
    fn test_half_pinned_coordinates_is_error() {
        let mut config = Config::default();
        config.location.latitude = Some(10.0);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("set together")));
        assert_eq!(config.location.pinned_coordinates(), None);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut config = Config::default();
        config.location.latitude = Some(91.0);
        config.location.longitude = Some(200.0);
        let result = config.validate();
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_pinned_coordinates_pair() {
        let mut config = Config::default();
        config.location.latitude = Some(10.0);
        config.location.longitude = Some(20.0);
        assert!(config.validate().is_valid());
        assert_eq!(config.location.pinned_coordinates(), Some((10.0, 20.0)));
    }

    #[test]
    fn test_location_defaults_match_platform_options() {
        let location = LocationConfig::default();
        assert!(location.high_accuracy);
        assert_eq!(location.timeout_ms, 15_000);
        assert_eq!(location.max_age_ms, 10_000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.weather.endpoint, config.weather.endpoint);
        assert_eq!(parsed.location.timeout_ms, config.location.timeout_ms);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            config_dir = "/tmp/skycast"

            [weather]
            endpoint = "https://example.com/v1"
            api_key = "abc123"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.weather.timeout_secs, 10);
        assert!(parsed.location.high_accuracy);
        assert!(parsed.weather.is_configured());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
