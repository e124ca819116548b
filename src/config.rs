//! Configuration management for the `FlightIdeas` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::FlightIdeasError;
use crate::models::Mode;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable accepted as a shortcut for `search.mode`
pub const MODE_ENV_VAR: &str = "FLIGHT_MODE";

/// Root configuration structure for the `FlightIdeas` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightIdeasConfig {
    /// Search behaviour and price source mode
    #[serde(default)]
    pub search: SearchConfig,
    /// Third-party flight API credentials
    #[serde(default)]
    pub apis: ApisConfig,
    /// Scraper settings
    #[serde(default)]
    pub scraping: ScrapingConfig,
    /// Mock price generator settings
    #[serde(default)]
    pub mock: MockConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Price source mode (mock, scraper, apis, hybrid); anything else means mock
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Origin airport used when none is given
    #[serde(default = "default_origin")]
    pub default_origin: String,
    /// Number of destination ideas per search
    #[serde(default = "default_destination_count")]
    pub destination_count: u32,
}

/// Flight API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApisConfig {
    /// Request timeout in seconds for every API call
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
    #[serde(default)]
    pub aviation_stack: AviationStackConfig,
    #[serde(default)]
    pub amadeus: AmadeusConfig,
    #[serde(default)]
    pub kiwi: KiwiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AviationStackConfig {
    #[serde(default)]
    pub enabled: bool,
    pub api_key: Option<String>,
    #[serde(default = "default_aviation_stack_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    #[serde(default)]
    pub enabled: bool,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_amadeus_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KiwiConfig {
    #[serde(default)]
    pub enabled: bool,
    pub api_key: Option<String>,
    #[serde(default = "default_kiwi_url")]
    pub base_url: String,
}

/// Scraper settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    /// Fetch the live results page instead of simulating prices
    #[serde(default)]
    pub live: bool,
    /// Results site root
    #[serde(default = "default_scraping_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_scraping_timeout")]
    pub timeout_ms: u64,
    /// Attempts per destination when scraping live
    #[serde(default = "default_scraping_retries")]
    pub retries: u32,
    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_scraping_retry_delay")]
    pub retry_delay_ms: u64,
    /// Artificial latency for the simulated scraper, in milliseconds
    #[serde(default)]
    pub simulated_delay_ms: u64,
}

/// Mock generator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    /// Artificial latency per destination in milliseconds
    #[serde(default)]
    pub delay_ms: u64,
    /// Seed for reproducible prices
    pub seed: Option<u64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Include booking URLs in logs
    #[serde(default)]
    pub show_urls: bool,
    /// Include individual prices in logs
    #[serde(default)]
    pub show_prices: bool,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_mode() -> String {
    "mock".to_string()
}

fn default_origin() -> String {
    "MAD".to_string()
}

fn default_destination_count() -> u32 {
    3
}

fn default_api_timeout() -> u32 {
    10
}

fn default_aviation_stack_url() -> String {
    "http://api.aviationstack.com/v1".to_string()
}

fn default_amadeus_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_kiwi_url() -> String {
    "https://tequila-api.kiwi.com".to_string()
}

fn default_scraping_url() -> String {
    "https://www.skyscanner.es".to_string()
}

fn default_scraping_timeout() -> u64 {
    10_000
}

fn default_scraping_retries() -> u32 {
    3
}

fn default_scraping_retry_delay() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            default_origin: default_origin(),
            destination_count: default_destination_count(),
        }
    }
}

impl Default for ApisConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_api_timeout(),
            aviation_stack: AviationStackConfig::default(),
            amadeus: AmadeusConfig::default(),
            kiwi: KiwiConfig::default(),
        }
    }
}

impl Default for AviationStackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: default_aviation_stack_url(),
        }
    }
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            client_id: None,
            client_secret: None,
            base_url: default_amadeus_url(),
        }
    }
}

impl Default for KiwiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: default_kiwi_url(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            live: false,
            base_url: default_scraping_url(),
            timeout_ms: default_scraping_timeout(),
            retries: default_scraping_retries(),
            retry_delay_ms: default_scraping_retry_delay(),
            simulated_delay_ms: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            show_urls: false,
            show_prices: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl ApisConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl ScrapingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl FlightIdeasConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. FLIGHTIDEAS_SEARCH__MODE=hybrid
        builder = builder.add_source(
            Environment::with_prefix("FLIGHTIDEAS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("search.mode", std::env::var(MODE_ENV_VAR).ok())
            .with_context(|| format!("Failed to apply {MODE_ENV_VAR} override"))?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: FlightIdeasConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flightideas").join("config.toml"))
    }

    /// Price source mode for the next request
    #[must_use]
    pub fn mode(&self) -> Mode {
        Mode::from_config(&self.search.mode)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.search.mode.trim().is_empty() {
            self.search.mode = default_mode();
        }
        if self.search.default_origin.trim().is_empty() {
            self.search.default_origin = default_origin();
        }
        if self.search.destination_count == 0 {
            self.search.destination_count = default_destination_count();
        }
        if self.apis.timeout_seconds == 0 {
            self.apis.timeout_seconds = default_api_timeout();
        }
        if self.scraping.base_url.is_empty() {
            self.scraping.base_url = default_scraping_url();
        }
        if self.scraping.timeout_ms == 0 {
            self.scraping.timeout_ms = default_scraping_timeout();
        }
        if self.scraping.retries == 0 {
            self.scraping.retries = default_scraping_retries();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let credentials = [
            ("Aviation Stack API key", &self.apis.aviation_stack.api_key),
            ("Amadeus client id", &self.apis.amadeus.client_id),
            ("Amadeus client secret", &self.apis.amadeus.client_secret),
            ("Kiwi API key", &self.apis.kiwi.api_key),
        ];

        for (name, value) in credentials {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(FlightIdeasError::config(format!(
                        "{name} cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if value.len() > 256 {
                    return Err(FlightIdeasError::config(format!(
                        "{name} appears to be invalid (too long). Please check your credentials."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.search.destination_count > 20 {
            return Err(FlightIdeasError::config("Destination count cannot exceed 20").into());
        }

        if self.apis.timeout_seconds > 120 {
            return Err(FlightIdeasError::config("API timeout cannot exceed 120 seconds").into());
        }

        if self.scraping.timeout_ms > 120_000 {
            return Err(
                FlightIdeasError::config("Scraping timeout cannot exceed 120000 ms").into(),
            );
        }

        if self.scraping.retries > 10 {
            return Err(FlightIdeasError::config("Scraping retries cannot exceed 10").into());
        }

        if self.scraping.retry_delay_ms > 60_000 || self.scraping.simulated_delay_ms > 60_000 {
            return Err(FlightIdeasError::config("Scraping delays cannot exceed 60000 ms").into());
        }

        if self.mock.delay_ms > 60_000 {
            return Err(FlightIdeasError::config("Mock delay cannot exceed 60000 ms").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FlightIdeasError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FlightIdeasError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let origin = self.search.default_origin.trim();
        if origin.len() != 3 || !origin.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FlightIdeasError::config(format!(
                "Default origin '{origin}' must be a three-letter IATA code"
            ))
            .into());
        }

        let urls = [
            ("Aviation Stack", &self.apis.aviation_stack.base_url),
            ("Amadeus", &self.apis.amadeus.base_url),
            ("Kiwi", &self.apis.kiwi.base_url),
            ("Scraping", &self.scraping.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FlightIdeasError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = FlightIdeasConfig::default();
        assert_eq!(config.search.mode, "mock");
        assert_eq!(config.mode(), Mode::Mock);
        assert_eq!(config.search.default_origin, "MAD");
        assert_eq!(config.search.destination_count, 3);
        assert_eq!(config.apis.timeout_seconds, 10);
        assert_eq!(config.scraping.retries, 3);
        assert_eq!(config.logging.level, "info");
        assert!(!config.apis.amadeus.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_mode_is_not_a_config_error() {
        let mut config = FlightIdeasConfig::default();
        config.search.mode = "puppeteer".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode(), Mode::Mock);
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = FlightIdeasConfig::default();
        config.apis.kiwi.api_key = Some("  ".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Kiwi API key"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = FlightIdeasConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = FlightIdeasConfig::default();
        config.scraping.retries = 50;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("retries cannot exceed"));
    }

    #[test]
    fn test_config_validation_origin() {
        let mut config = FlightIdeasConfig::default();
        config.search.default_origin = "MADRID".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = FlightIdeasConfig::default();
        config.search.mode = String::new();
        config.search.destination_count = 0;
        config.scraping.retries = 0;
        config.apply_defaults();
        assert_eq!(config.search.mode, "mock");
        assert_eq!(config.search.destination_count, 3);
        assert_eq!(config.scraping.retries, 3);
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "flightideas-config-{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"
[search]
mode = "hybrid"
default_origin = "BCN"

[scraping]
live = true
retries = 2

[apis.kiwi]
enabled = true
api_key = "kiwi-test-key"
"#,
        )
        .unwrap();

        let config = FlightIdeasConfig::load_from_path(Some(path.clone()));
        fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(config.search.default_origin, "BCN");
        assert!(config.scraping.live);
        assert_eq!(config.scraping.retries, 2);
        assert!(config.apis.kiwi.enabled);
        assert_eq!(config.apis.kiwi.api_key.as_deref(), Some("kiwi-test-key"));
        assert_eq!(config.apis.kiwi.base_url, "https://tequila-api.kiwi.com");
        // untouched sections keep their defaults
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = FlightIdeasConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("flightideas"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
